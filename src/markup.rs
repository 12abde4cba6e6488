//! Structural edits of SVG markup.
//!
//! Edits are located through the XML parser's byte ranges and spliced
//! into the original text, so everything outside the touched attribute
//! is preserved exactly (geometry, attribute order, whitespace, comments).

use std::borrow::Cow;
use std::ops::Range;

use roxmltree::{Document, Node, ParsingOptions};

use crate::color::FillColor;
use crate::error::ParseError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Parses markup and checks that the root element is `svg`, either
/// un-namespaced or in the SVG namespace.
fn parse(markup: &str) -> Result<Document<'_>, ParseError> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(markup, opts)?;

    let tag = doc.root_element().tag_name();
    let found = match tag.namespace() {
        None | Some(SVG_NS) if tag.name() == "svg" => None,
        None => Some(tag.name().to_string()),
        Some(ns) => Some(format!("{{{ns}}}{}", tag.name())),
    };

    match found {
        Some(found) => Err(ParseError::UnexpectedRoot { found }),
        None => Ok(doc),
    }
}

/// Byte offset just past the root tag's qualified name (`<svg` or `<svg:svg`).
fn root_name_end(markup: &str, root: Node<'_, '_>) -> usize {
    let name_start = root.range().start + 1;
    let rest = &markup[name_start..];
    let len = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    name_start + len
}

/// Full byte range of an attribute on `root`, including its closing quote
/// and the whitespace that separates it from the previous token.
fn attribute_span(markup: &str, qname: Range<usize>, value: Range<usize>, floor: usize) -> Range<usize> {
    let bytes = markup.as_bytes();

    let mut end = value.end;
    if matches!(bytes.get(end), Some(b'"' | b'\'')) {
        end += 1;
    }

    let mut start = qname.start;
    while start > floor && bytes[start - 1].is_ascii_whitespace() {
        start -= 1;
    }

    start..end
}

/// Applies non-overlapping edits. Each edit replaces a byte range.
fn splice(markup: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start).then(b.0.end.cmp(&a.0.end)));

    let mut out = markup.to_string();
    for (range, text) in edits {
        out.replace_range(range, &text);
    }
    out
}

/// Sets the root element's `fill` attribute to `color`.
///
/// Any existing un-namespaced `fill` on the root is removed first, then a
/// single `fill="#..."` is inserted right after the tag name. Nothing else
/// in the document changes.
///
/// ```
/// use tinticon::{markup, FillColor};
///
/// let red = FillColor::parse("#FF0000").unwrap();
/// let out = markup::colorize(r#"<svg fill="blue" viewBox="0 0 24 24"><path d="M0 0h24"/></svg>"#, &red).unwrap();
/// assert_eq!(out, r##"<svg fill="#FF0000" viewBox="0 0 24 24"><path d="M0 0h24"/></svg>"##);
/// ```
pub fn colorize(markup: &str, color: &FillColor) -> Result<String, ParseError> {
    let doc = parse(markup)?;
    let root = doc.root_element();
    let name_end = root_name_end(markup, root);

    let mut edits: Vec<(Range<usize>, String)> = root
        .attributes()
        .filter(|attr| attr.namespace().is_none() && attr.name() == "fill")
        .map(|attr| {
            let span = attribute_span(markup, attr.range_qname(), attr.range_value(), name_end);
            (span, String::new())
        })
        .collect();

    edits.push((name_end..name_end, format!(r#" fill="{color}""#)));

    Ok(splice(markup, edits))
}

/// Markup ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderMarkup<'a> {
    /// The markup, with the SVG namespace declared on the root.
    pub text: Cow<'a, str>,

    /// The first reference to a resource outside the document, if any.
    pub external_reference: Option<String>,
}

/// Prepares markup for rasterization.
///
/// Icons served without `xmlns` render fine inline in HTML but not as
/// standalone documents, so the SVG namespace is declared when missing.
/// References that would need a network or file fetch are reported.
pub fn prepare_for_render(markup: &str) -> Result<RenderMarkup<'_>, ParseError> {
    let doc = parse(markup)?;
    let root = doc.root_element();

    let external_reference = doc
        .descendants()
        .filter(Node::is_element)
        .flat_map(|node| node.attributes())
        .filter(|attr| attr.name() == "href")
        .map(|attr| attr.value().trim())
        .find(|value| is_external(value))
        .map(str::to_string);

    let text = if root.tag_name().namespace() == Some(SVG_NS) {
        Cow::Borrowed(markup)
    } else {
        let at = root_name_end(markup, root);
        Cow::Owned(splice(markup, vec![(at..at, format!(r#" xmlns="{SVG_NS}""#))]))
    };

    Ok(RenderMarkup {
        text,
        external_reference,
    })
}

fn is_external(href: &str) -> bool {
    !(href.is_empty() || href.starts_with('#') || href.starts_with("data:"))
}

/// Returns the value of the root element's un-namespaced `fill` attribute.
pub fn root_fill(markup: &str) -> Result<Option<String>, ParseError> {
    let doc = parse(markup)?;
    let fill = doc
        .root_element()
        .attributes()
        .find(|attr| attr.namespace().is_none() && attr.name() == "fill")
        .map(|attr| attr.value().to_string());
    Ok(fill)
}

//! Multi-resolution ICO containers with PNG-compressed frames.
//!
//! # Layout
//!
//! ```text
//! offset  size  field
//! 0       2     reserved = 0
//! 2       2     type = 1 (icon)
//! 4       2     image count N
//! 6       16*N  directory entries, in frame order:
//!                 width u8 (256 -> 0), height u8 (256 -> 0),
//!                 color count = 0, reserved = 0,
//!                 planes u16 = 1, bit depth u16 = 32,
//!                 data length u32, data offset u32
//! 6+16N   ...   PNG streams, in frame order
//! ```
//!
//! All integers are little-endian.

use std::collections::HashSet;
use std::io::{self, Write};

use crate::error::IcoError;

const HEADER_LEN: usize = 6;
const ENTRY_LEN: usize = 16;
const ICON_TYPE: u16 = 1;
const PLANES: u16 = 1;
const BIT_DEPTH: u16 = 32;
const MAX_IMAGES: usize = u16::MAX as usize;

/// Largest frame size a directory entry can describe.
pub const MAX_ICO_SIZE: u32 = 256;

/// One PNG-compressed frame of an icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoFrame {
    pub size: u32,
    pub png: Vec<u8>,
}

/// An ordered set of PNG frames, unique by size.
///
/// ```
/// use tinticon::IcoContainer;
///
/// let mut ico = IcoContainer::new();
/// ico.push(16, vec![1, 2, 3]).unwrap();
/// ico.push(32, vec![4, 5]).unwrap();
/// assert!(ico.push(16, vec![6]).is_err());
///
/// let bytes = ico.to_bytes().unwrap();
/// assert_eq!(bytes.len(), 6 + 2 * 16 + 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcoContainer {
    frames: Vec<IcoFrame>,
}

impl IcoContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a container from `(size, png)` pairs, rejecting repeated sizes.
    pub fn from_frames(frames: impl IntoIterator<Item = (u32, Vec<u8>)>) -> Result<Self, IcoError> {
        let mut ico = Self::new();
        for (size, png) in frames {
            ico.push(size, png)?;
        }
        Ok(ico)
    }

    /// Appends a frame. Fails if the size is outside `1..=256` or a frame
    /// of this size is already present.
    pub fn push(&mut self, size: u32, png: Vec<u8>) -> Result<(), IcoError> {
        if size == 0 || size > MAX_ICO_SIZE {
            return Err(IcoError::SizeOutOfRange {
                size,
                max: MAX_ICO_SIZE,
            });
        }
        if self.frames.iter().any(|f| f.size == size) {
            return Err(IcoError::DuplicateSize { size });
        }
        self.frames.push(IcoFrame { size, png });
        Ok(())
    }

    pub fn frames(&self) -> &[IcoFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total size of the encoded container in bytes.
    pub fn encoded_len(&self) -> usize {
        self.data_start() + self.frames.iter().map(|f| f.png.len()).sum::<usize>()
    }

    fn data_start(&self) -> usize {
        HEADER_LEN + ENTRY_LEN * self.frames.len()
    }

    fn check(&self) -> Result<(), IcoError> {
        if self.frames.is_empty() {
            return Err(IcoError::Empty);
        }
        if self.frames.len() > MAX_IMAGES {
            return Err(IcoError::TooManyImages {
                count: self.frames.len(),
                max: MAX_IMAGES,
            });
        }
        if u32::try_from(self.encoded_len()).is_err() {
            let largest = self
                .frames
                .iter()
                .max_by_key(|f| f.png.len())
                .map(|f| (f.size, f.png.len()))
                .unwrap_or_default();
            return Err(IcoError::ImageTooLarge {
                size: largest.0,
                len: largest.1,
            });
        }
        Ok(())
    }

    /// Writes the container to `writer`.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        self.check()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

        // Header
        writer.write_all(&0u16.to_le_bytes())?;
        writer.write_all(&ICON_TYPE.to_le_bytes())?;
        writer.write_all(&(self.frames.len() as u16).to_le_bytes())?;

        // Directory
        let mut offset = self.data_start() as u32;
        for frame in &self.frames {
            let dim = dimension_byte(frame.size);
            let len = frame.png.len() as u32;

            writer.write_all(&[dim, dim, 0, 0])?;
            writer.write_all(&PLANES.to_le_bytes())?;
            writer.write_all(&BIT_DEPTH.to_le_bytes())?;
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(&offset.to_le_bytes())?;

            offset += len;
        }

        // Image data
        for frame in &self.frames {
            writer.write_all(&frame.png)?;
        }

        Ok(())
    }

    /// Encodes the container into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IcoError> {
        self.check()?;
        let mut buffer = Vec::with_capacity(self.encoded_len());
        // Writing to a Vec only fails on the checks above
        self.write(&mut buffer)
            .map_err(|_| IcoError::InvalidHeader("unencodable container"))?;
        Ok(buffer)
    }
}

/// Width/height byte for a logical size. 256 is written as 0.
fn dimension_byte(size: u32) -> u8 {
    if size >= MAX_ICO_SIZE { 0 } else { size as u8 }
}

/// A directory entry read back from an encoded container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcoEntry {
    /// Width in pixels, with the 0 -> 256 convention applied.
    pub width: u32,
    pub height: u32,
    pub color_count: u8,
    pub planes: u16,
    pub bit_depth: u16,
    pub len: u32,
    pub offset: u32,
}

/// The header and directory of an encoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoDirectory {
    pub entries: Vec<IcoEntry>,
}

impl IcoDirectory {
    /// Reads the header and directory of `bytes`, checking that every entry
    /// lies within the buffer.
    pub fn parse(bytes: &[u8]) -> Result<Self, IcoError> {
        if bytes.len() < HEADER_LEN {
            return Err(IcoError::Truncated("header"));
        }
        if read_u16(bytes, 0) != 0 {
            return Err(IcoError::InvalidHeader("reserved field is not zero"));
        }
        if read_u16(bytes, 2) != ICON_TYPE {
            return Err(IcoError::InvalidHeader("not an icon resource"));
        }

        let count = read_u16(bytes, 4) as usize;
        if bytes.len() < HEADER_LEN + ENTRY_LEN * count {
            return Err(IcoError::Truncated("directory"));
        }

        let entries = (0..count)
            .map(|index| {
                let at = HEADER_LEN + ENTRY_LEN * index;
                let entry = IcoEntry {
                    width: logical_dimension(bytes[at]),
                    height: logical_dimension(bytes[at + 1]),
                    color_count: bytes[at + 2],
                    planes: read_u16(bytes, at + 4),
                    bit_depth: read_u16(bytes, at + 6),
                    len: read_u32(bytes, at + 8),
                    offset: read_u32(bytes, at + 12),
                };

                let end = entry.offset as usize + entry.len as usize;
                if end > bytes.len() {
                    return Err(IcoError::EntryOutOfBounds { index });
                }
                Ok(entry)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// The image data an entry points at.
    pub fn image_data<'a>(&self, bytes: &'a [u8], index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = entry.offset as usize;
        bytes.get(start..start + entry.len as usize)
    }

    /// True if no two entries declare the same width.
    pub fn has_unique_sizes(&self) -> bool {
        let mut seen = HashSet::new();
        self.entries.iter().all(|e| seen.insert(e.width))
    }
}

fn logical_dimension(byte: u8) -> u32 {
    if byte == 0 { 256 } else { byte as u32 }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

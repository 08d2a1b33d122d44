//! Readers for the IDX files the MNIST dataset is distributed in.
//!
//! Both formats start with a big-endian `u32` magic number and item count. Image files follow
//! with the row and column count of every image, then one byte per pixel; label files follow
//! with one byte per label.

use std::error::Error;
use std::fmt;
use std::io::{Error as IoError, ErrorKind, Read};

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

/// The pixels of every image in an image file, concatenated in file order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawImages {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    pub pixels: Vec<u8>,
}

impl RawImages {
    pub fn image(&self, index: usize) -> Option<&[u8]> {
        let size = self.rows.checked_mul(self.cols)?;
        let start = index.checked_mul(size)?;
        self.pixels.get(start..start.checked_add(size)?)
    }
}

pub fn read_images(mut reader: impl Read) -> Result<RawImages, DatasetError> {
    check_magic(&mut reader, IMAGES_MAGIC)?;

    let count = read_u32(&mut reader, "image count")? as usize;
    let rows = read_u32(&mut reader, "row count")? as usize;
    let cols = read_u32(&mut reader, "column count")? as usize;

    let length = rows
        .checked_mul(cols)
        .and_then(|size| size.checked_mul(count))
        .ok_or(DatasetError::Truncated("image data"))?;
    let pixels = read_body(&mut reader, length, "image data")?;

    Ok(RawImages {
        count,
        rows,
        cols,
        pixels,
    })
}

pub fn read_labels(mut reader: impl Read) -> Result<Vec<u8>, DatasetError> {
    check_magic(&mut reader, LABELS_MAGIC)?;

    let count = read_u32(&mut reader, "label count")? as usize;
    read_body(&mut reader, count, "label data")
}

fn check_magic(reader: &mut impl Read, expected: u32) -> Result<(), DatasetError> {
    let found = read_u32(reader, "magic number")?;
    if found != expected {
        return Err(DatasetError::BadMagic { expected, found });
    }
    Ok(())
}

fn read_u32(reader: &mut impl Read, section: &'static str) -> Result<u32, DatasetError> {
    let mut buffer = [0; 4];
    reader.read_exact(&mut buffer).map_err(|error| match error.kind() {
        ErrorKind::UnexpectedEof => DatasetError::Truncated(section),
        _ => error.into(),
    })?;
    Ok(u32::from_be_bytes(buffer))
}

fn read_body(
    reader: &mut impl Read,
    length: usize,
    section: &'static str,
) -> Result<Vec<u8>, DatasetError> {
    // Read through `take` so a corrupt header can't make us allocate more than the file holds.
    let mut body = Vec::new();
    reader.take(length as u64).read_to_end(&mut body)?;

    if body.len() != length {
        return Err(DatasetError::Truncated(section));
    }
    Ok(body)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DatasetError {
    Io(String),
    BadMagic { expected: u32, found: u32 },
    /// The input ended inside the named section.
    Truncated(&'static str),
    CountMismatch { images: usize, labels: usize },
}

impl From<IoError> for DatasetError {
    fn from(error: IoError) -> Self {
        DatasetError::Io(error.to_string())
    }
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::BadMagic { expected, found } => {
                write!(f, "bad magic number: expected {expected}, found {found}")
            }
            Self::Truncated(section) => write!(f, "input ended while reading {section}"),
            Self::CountMismatch { images, labels } => {
                write!(f, "{images} images but {labels} labels")
            }
        }
    }
}

impl Error for DatasetError {}

//! Primitive encodings of the big-endian `DataOutput` layout.
//!
//! Strings use the "modified UTF-8" form: a `u16` byte length followed by the
//! UTF-16 code units of the string, each written as one to three bytes. NUL
//! takes two bytes (`C0 80`) and a supplementary character is written as its
//! two surrogates, three bytes each.

use std::io::{Read, Write};

use byteorder::{BE, ReadBytesExt, WriteBytesExt};
use fielddata_common::{Result, error::Error, verify_arg};

/// Longest encoded string, in bytes.
pub const MAX_UTF_LEN: usize = u16::MAX as usize;

/// Number of bytes `s` takes in modified UTF-8, excluding the length prefix.
pub fn utf_len(s: &str) -> usize {
    s.encode_utf16()
        .map(|unit| match unit {
            0x0001..=0x007f => 1,
            0x0000 | 0x0080..=0x07ff => 2,
            _ => 3,
        })
        .sum()
}

pub fn write_utf<W: Write + ?Sized>(w: &mut W, s: &str) -> Result<()> {
    let len = utf_len(s);
    verify_arg!(s, len <= MAX_UTF_LEN, "encoded length {len} exceeds {MAX_UTF_LEN}");
    let mut buf = Vec::with_capacity(2 + len);
    buf.write_u16::<BE>(len as u16)?;
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007f => buf.push(unit as u8),
            0x0000 | 0x0080..=0x07ff => {
                buf.push(0xc0 | (unit >> 6) as u8);
                buf.push(0x80 | (unit & 0x3f) as u8);
            }
            _ => {
                buf.push(0xe0 | (unit >> 12) as u8);
                buf.push(0x80 | ((unit >> 6) & 0x3f) as u8);
                buf.push(0x80 | (unit & 0x3f) as u8);
            }
        }
    }
    w.write_all(&buf)?;
    Ok(())
}

pub fn read_utf<R: Read + ?Sized>(r: &mut R) -> Result<String> {
    let len = r.read_u16::<BE>()? as usize;
    let mut bytes = vec![0u8; len];
    r.read_exact(&mut bytes)?;
    decode_utf(&bytes)
}

fn decode_utf(bytes: &[u8]) -> Result<String> {
    let malformed = |pos: usize| {
        Error::invalid_format("string", format!("malformed input around byte {pos}"))
    };
    let continuation = |pos: usize| -> Result<u16> {
        match bytes.get(pos) {
            Some(&b) if b & 0xc0 == 0x80 => Ok((b & 0x3f) as u16),
            _ => Err(malformed(pos)),
        }
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        match b >> 4 {
            0x0..=0x7 => {
                units.push(b as u16);
                pos += 1;
            }
            0xc | 0xd => {
                units.push(((b & 0x1f) as u16) << 6 | continuation(pos + 1)?);
                pos += 2;
            }
            0xe => {
                let high = ((b & 0x0f) as u16) << 12;
                units.push(high | continuation(pos + 1)? << 6 | continuation(pos + 2)?);
                pos += 3;
            }
            _ => return Err(malformed(pos)),
        }
    }
    String::from_utf16(&units)
        .map_err(|_| Error::invalid_format("string", "unpaired surrogate"))
}

pub fn write_bool<W: Write + ?Sized>(w: &mut W, value: bool) -> Result<()> {
    w.write_u8(value as u8)?;
    Ok(())
}

/// Any non-zero byte reads as `true`.
pub fn read_bool<R: Read + ?Sized>(r: &mut R) -> Result<bool> {
    Ok(r.read_u8()? != 0)
}

/// Writes an `i32` element count.
pub fn write_len<W: Write + ?Sized>(w: &mut W, len: usize) -> Result<()> {
    let len = i32::try_from(len)
        .map_err(|_| Error::invalid_arg("len", format!("{len} exceeds i32::MAX")))?;
    w.write_i32::<BE>(len)?;
    Ok(())
}

/// Writes a counted string array; `None` is written as `absent` (`-1` or `0`).
pub fn write_strings<W: Write + ?Sized>(
    w: &mut W,
    values: Option<&[String]>,
    absent: i32,
) -> Result<()> {
    match values {
        None => w.write_i32::<BE>(absent)?,
        Some(values) => {
            write_len(w, values.len())?;
            for value in values {
                write_utf(w, value)?;
            }
        }
    }
    Ok(())
}

/// Reads a counted string array. A count of `absent` reads as `None`; any
/// other negative count is malformed.
pub fn read_strings<R: Read + ?Sized>(
    r: &mut R,
    element: &str,
    absent: i32,
) -> Result<Option<Vec<String>>> {
    let count = r.read_i32::<BE>()?;
    if count == absent {
        return Ok(None);
    }
    if count < 0 {
        return Err(Error::invalid_format(
            element,
            format!("negative count {count}"),
        ));
    }
    let mut values = Vec::with_capacity((count as usize).min(64));
    for _ in 0..count {
        values.push(read_utf(r)?);
    }
    Ok(Some(values))
}

/// Reads `len` raw bytes without trusting `len` for the allocation.
pub fn read_bytes<R: Read + ?Sized>(r: &mut R, element: &str, len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    Read::take(&mut *r, len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(Error::invalid_format(
            element,
            format!("expected {len} bytes, found {}", bytes.len()),
        ));
    }
    Ok(bytes)
}

use std::io;
use std::str::from_utf8;

use byteorder::WriteBytesExt;

use super::Error;

/// Longest label a length octet can describe, RFC 1035 section 2.3.4
pub const MAX_LABEL_LEN: usize = 63;

const POINTER_MASK: u8 = 0b1100_0000;

/// Writes `name` as a sequence of length-prefixed labels
///
/// A trailing dot is optional, the zero-length root label is always written.
/// No compression is done on output.
pub fn write_name<W: io::Write>(name: &str, writer: &mut W) -> Result<(), Error> {
    for label in name.split('.').filter(|label| !label.is_empty()) {
        if label.len() > MAX_LABEL_LEN {
            return Err(Error::LabelTooLong(label.len()));
        }
        writer.write_u8(label.len() as u8)?;
        writer.write_all(label.as_bytes())?;
    }
    writer.write_u8(0)?;
    Ok(())
}

/// Reads the name starting at `start` in the message `data`
///
/// Returns the dotted name (with the trailing dot of the root label) and the
/// number of bytes the name occupies at `start`. When the name is compressed
/// that count stops right after the first pointer, no matter where the
/// pointer chain leads.
///
/// Every pointer must refer to an offset below the label run it was found
/// in, so decoding always terminates.
pub fn read_name(data: &[u8], start: usize) -> Result<(String, usize), Error> {
    let mut labels = Vec::new();
    let mut pos = start;
    let mut floor = start;
    let mut resume_at = None;

    loop {
        let byte = *data.get(pos).ok_or(Error::MalformedName)?;
        if byte & POINTER_MASK == POINTER_MASK {
            let low = *data.get(pos + 1).ok_or(Error::MalformedName)?;
            let offset = (usize::from(byte & !POINTER_MASK) << 8) | usize::from(low);
            if offset >= floor {
                return Err(Error::MalformedName);
            }
            if resume_at.is_none() {
                resume_at = Some(pos + 2);
            }
            pos = offset;
            floor = offset;
        } else if byte & POINTER_MASK == 0 {
            let end = pos + 1 + usize::from(byte);
            let label = data.get(pos + 1..end).ok_or(Error::MalformedName)?;
            labels.push(from_utf8(label).map_err(|_| Error::LabelIsNotUtf8)?);
            pos = end;
            if byte == 0 {
                break;
            }
        } else {
            return Err(Error::MalformedName);
        }
    }

    let consumed = resume_at.unwrap_or(pos) - start;
    Ok((labels.join("."), consumed))
}

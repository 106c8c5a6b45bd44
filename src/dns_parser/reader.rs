use byteorder::{BigEndian, ByteOrder};

use super::{name, Error};

/// A cursor over a whole DNS message
///
/// Names may point back anywhere in the message, so the reader always keeps
/// the complete buffer and only moves its position forward.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Reader<'a> {
        Reader { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) -> Result<(), Error> {
        if pos > self.data.len() {
            return Err(Error::UnexpectedEOF);
        }
        self.pos = pos;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.read_bytes(2).map(BigEndian::read_u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.read_bytes(4).map(BigEndian::read_u32)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(len).ok_or(Error::UnexpectedEOF)?;
        let bytes = self.data.get(self.pos..end).ok_or(Error::UnexpectedEOF)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Reads a possibly compressed name and leaves the cursor right after it
    pub fn read_name(&mut self) -> Result<String, Error> {
        let (name, consumed) = name::read_name(self.data, self.pos)?;
        self.pos += consumed;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_fields() {
        let mut reader = Reader::new(b"\x01\x02\x03\x00\x00\x0a\x28");
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_u16().unwrap(), 0x0203);
        assert_eq!(reader.read_u32().unwrap(), 2600);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn short_read_is_an_error() {
        let mut reader = Reader::new(b"\x01");
        assert!(matches!(reader.read_u16(), Err(Error::UnexpectedEOF)));
        assert_eq!(reader.position(), 0);
    }
}

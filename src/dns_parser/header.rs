use byteorder::{BigEndian, ByteOrder};

use super::{Error, Reader};

pub const HEADER_LEN: usize = 12;

const QR_MASK: u16 = 0x8000;
const OPCODE_MASK: u16 = 0x7800;
const AA_MASK: u16 = 0x0400;
const TC_MASK: u16 = 0x0200;
const RCODE_MASK: u16 = 0x000F;

const QUESTIONS_OFFSET: usize = 4;
const ANSWERS_OFFSET: usize = 6;
#[cfg(test)]
const ADDITIONAL_OFFSET: usize = 10;

/// Fixed twelve byte header of every DNS message
///
/// The flags word is kept as transmitted, accessors pick out the fields
/// mDNS cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub questions: u16,
    pub answers: u16,
    pub nameservers: u16,
    pub additional: u16,
}

impl Header {
    pub fn parse(reader: &mut Reader) -> Result<Header, Error> {
        if reader.remaining() < HEADER_LEN {
            return Err(Error::HeaderTooShort);
        }
        Ok(Header {
            id: reader.read_u16()?,
            flags: reader.read_u16()?,
            questions: reader.read_u16()?,
            answers: reader.read_u16()?,
            nameservers: reader.read_u16()?,
            additional: reader.read_u16()?,
        })
    }

    pub fn write(&self, data: &mut [u8]) {
        BigEndian::write_u16(&mut data[0..2], self.id);
        BigEndian::write_u16(&mut data[2..4], self.flags);
        BigEndian::write_u16(&mut data[4..6], self.questions);
        BigEndian::write_u16(&mut data[6..8], self.answers);
        BigEndian::write_u16(&mut data[8..10], self.nameservers);
        BigEndian::write_u16(&mut data[10..12], self.additional);
    }

    pub fn is_response(&self) -> bool {
        self.flags & QR_MASK == QR_MASK
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags & OPCODE_MASK) >> 11) as u8
    }

    pub fn authoritative(&self) -> bool {
        self.flags & AA_MASK != 0
    }

    pub fn truncated(&self) -> bool {
        self.flags & TC_MASK != 0
    }

    pub fn response_code(&self) -> u8 {
        (self.flags & RCODE_MASK) as u8
    }

    #[cfg(test)]
    pub fn response_flags(authoritative: bool) -> u16 {
        if authoritative {
            QR_MASK | AA_MASK
        } else {
            QR_MASK
        }
    }

    pub fn inc_questions(data: &mut [u8]) -> Result<u16, Error> {
        Header::increment(data, QUESTIONS_OFFSET)
    }

    #[cfg(test)]
    pub fn inc_answers(data: &mut [u8]) -> Result<u16, Error> {
        Header::increment(data, ANSWERS_OFFSET)
    }

    #[cfg(test)]
    pub fn inc_additional(data: &mut [u8]) -> Result<u16, Error> {
        Header::increment(data, ADDITIONAL_OFFSET)
    }

    pub fn question_count(data: &[u8]) -> u16 {
        BigEndian::read_u16(&data[QUESTIONS_OFFSET..QUESTIONS_OFFSET + 2])
    }

    pub fn answer_count(data: &[u8]) -> u16 {
        BigEndian::read_u16(&data[ANSWERS_OFFSET..ANSWERS_OFFSET + 2])
    }

    fn increment(data: &mut [u8], offset: usize) -> Result<u16, Error> {
        let count = BigEndian::read_u16(&data[offset..offset + 2])
            .checked_add(1)
            .ok_or(Error::TooManyEntries)?;
        BigEndian::write_u16(&mut data[offset..offset + 2], count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_authoritative_response_header() {
        let data = b"\x00\x00\x84\x00\x00\x00\x00\x01\x00\x00\x00\x03";
        let header = Header::parse(&mut Reader::new(data)).unwrap();
        assert!(header.is_response());
        assert!(header.authoritative());
        assert!(!header.truncated());
        assert_eq!(header.opcode(), 0);
        assert_eq!(header.response_code(), 0);
        assert_eq!(header.answers, 1);
        assert_eq!(header.additional, 3);
    }

    #[test]
    fn short_header() {
        let data = b"\x00\x00\x84\x00\x00\x00";
        assert!(matches!(
            Header::parse(&mut Reader::new(data)),
            Err(Error::HeaderTooShort)
        ));
    }

    #[test]
    fn write_then_count() {
        let mut data = [0u8; HEADER_LEN];
        Header::default().write(&mut data);
        assert_eq!(Header::inc_questions(&mut data).unwrap(), 1);
        assert_eq!(Header::inc_answers(&mut data).unwrap(), 1);
        assert_eq!(Header::inc_answers(&mut data).unwrap(), 2);
        assert_eq!(Header::question_count(&data), 1);
        assert_eq!(Header::answer_count(&data), 2);
    }
}

use std::marker::PhantomData;

use byteorder::{BigEndian, WriteBytesExt};

use super::header::HEADER_LEN;
use super::{write_name, Error, Header, Question, CLASS_TOP_BIT};
#[cfg(test)]
use super::ResourceRecord;

pub enum Questions {}
#[cfg(test)]
pub enum Answers {}
#[cfg(test)]
pub enum Additional {}

pub trait MoveTo<T> {}
impl<T> MoveTo<T> for T {}

#[cfg(test)]
impl MoveTo<Answers> for Questions {}

#[cfg(test)]
impl MoveTo<Additional> for Questions {}
#[cfg(test)]
impl MoveTo<Additional> for Answers {}

/// Allows to build a DNS packet
///
/// Queries are all this client ever sends. Answer sections can be filled in
/// tests, to fake what a responder would say.
pub struct Builder<S> {
    buf: Vec<u8>,
    _state: PhantomData<S>,
}

impl Builder<Questions> {
    /// Creates a new query
    ///
    /// mDNS queries carry a zero flags word, so the only input is the id,
    /// which should also be zero unless the query is sent unicast.
    pub fn new_query(id: u16) -> Builder<Questions> {
        Builder::with_header(Header {
            id,
            ..Header::default()
        })
    }

    #[cfg(test)]
    pub fn new_response(id: u16, authoritative: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            id,
            flags: Header::response_flags(authoritative),
            ..Header::default()
        })
    }

    fn with_header(head: Header) -> Builder<Questions> {
        let mut buf = Vec::with_capacity(512);
        buf.extend([0u8; HEADER_LEN].iter());
        head.write(&mut buf[..HEADER_LEN]);
        Builder {
            buf,
            _state: PhantomData,
        }
    }
}

impl<T> Builder<T> {
    #[cfg(test)]
    fn write_rr(&mut self, record: &ResourceRecord) -> Result<(), Error> {
        use byteorder::ByteOrder;

        write_name(&record.name, &mut self.buf)?;
        self.buf.write_u16::<BigEndian>(record.typ() as u16)?;
        self.buf.write_u16::<BigEndian>(record.cls as u16)?;
        self.buf.write_u32::<BigEndian>(record.ttl)?;

        let size_offset = self.buf.len();
        self.buf.write_u16::<BigEndian>(0)?;

        let data_offset = self.buf.len();
        record.data.write_to(&mut self.buf)?;
        let data_size = self.buf.len() - data_offset;

        BigEndian::write_u16(
            &mut self.buf[size_offset..size_offset + 2],
            data_size as u16,
        );
        Ok(())
    }

    /// Returns the final packet
    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    pub fn move_to<U>(self) -> Builder<U>
    where
        T: MoveTo<U>,
    {
        Builder {
            buf: self.buf,
            _state: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool {
        Header::question_count(&self.buf) == 0 && Header::answer_count(&self.buf) == 0
    }
}

impl<T: MoveTo<Questions>> Builder<T> {
    /// Adds a question to the packet
    ///
    /// With `unicast_response` the top bit of QCLASS asks responders to
    /// answer us directly (RFC 6762 section 5.4).
    pub fn add_question(
        self,
        question: &Question,
        unicast_response: bool,
    ) -> Result<Builder<Questions>, Error> {
        let mut builder = self.move_to::<Questions>();

        let mut qclass = question.qclass as u16;
        if unicast_response {
            qclass |= CLASS_TOP_BIT;
        }
        write_name(&question.qname, &mut builder.buf)?;
        builder.buf.write_u16::<BigEndian>(question.qtype as u16)?;
        builder.buf.write_u16::<BigEndian>(qclass)?;
        Header::inc_questions(&mut builder.buf)?;
        Ok(builder)
    }
}

#[cfg(test)]
impl<T: MoveTo<Answers>> Builder<T> {
    pub fn add_answer(self, record: &ResourceRecord) -> Result<Builder<Answers>, Error> {
        let mut builder = self.move_to::<Answers>();

        builder.write_rr(record)?;
        Header::inc_answers(&mut builder.buf)?;

        Ok(builder)
    }
}

#[cfg(test)]
impl<T: MoveTo<Additional>> Builder<T> {
    pub fn add_additional(self, record: &ResourceRecord) -> Result<Builder<Additional>, Error> {
        let mut builder = self.move_to::<Additional>();

        builder.write_rr(record)?;
        Header::inc_additional(&mut builder.buf)?;

        Ok(builder)
    }
}

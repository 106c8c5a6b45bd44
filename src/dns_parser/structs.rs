use std::fmt;

use super::{
    Builder, Class, Error, QueryClass, QueryType, RRData, Reader, Type, CLASS_TOP_BIT,
};
use crate::service::{Domain, ServiceType};

/// A question we ask, or one echoed back in a response
///
/// Two questions are the same question when name, type and class match,
/// which is what keeps a discovery run from asking anything twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub qname: String,
    pub qtype: QueryType,
    pub qclass: QueryClass,
}

impl Question {
    pub fn new<N: Into<String>>(qname: N, qtype: QueryType, qclass: QueryClass) -> Question {
        Question {
            qname: qname.into(),
            qtype,
            qclass,
        }
    }

    /// The PTR question listing every instance of `service` in `domain`
    pub fn browse(service: &ServiceType, domain: &Domain) -> Question {
        let mut qname = service
            .labels()
            .iter()
            .chain(domain.labels())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".");
        qname.push('.');
        Question::new(qname, QueryType::PTR, QueryClass::IN)
    }

    pub fn parse(reader: &mut Reader) -> Result<Question, Error> {
        let qname = reader.read_name()?;
        let qtype = QueryType::parse(reader.read_u16()?)?;
        let qclass = QueryClass::parse(reader.read_u16()? & !CLASS_TOP_BIT)?;
        Ok(Question {
            qname,
            qtype,
            qclass,
        })
    }

    /// Encodes a complete query message carrying only this question,
    /// with the unicast response bit set
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(Builder::new_query(0).add_question(self, true)?.build())
    }

    pub fn answered_by(&self, record: &ResourceRecord) -> bool {
        record.name == self.qname
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {:?}", self.qname, self.qtype, self.qclass)
    }
}

/// A single DNS record
///
/// Only the five record types needed for service discovery are supported.
/// The cache flush bit of the class field is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    pub name: String,
    pub cls: Class,
    pub ttl: u32,
    pub data: RRData,
}

impl ResourceRecord {
    pub fn new<N: Into<String>>(name: N, ttl: u32, data: RRData) -> ResourceRecord {
        ResourceRecord {
            name: name.into(),
            cls: Class::IN,
            ttl,
            data,
        }
    }

    pub fn parse(reader: &mut Reader) -> Result<ResourceRecord, Error> {
        let name = reader.read_name()?;
        let typ = Type::parse(reader.read_u16()?)?;
        let cls = Class::parse(reader.read_u16()? & !CLASS_TOP_BIT)?;
        let ttl = reader.read_u32()?;
        let rdlength = usize::from(reader.read_u16()?);
        let data = RRData::parse(typ, reader, rdlength)?;
        Ok(ResourceRecord {
            name,
            cls,
            ttl,
            data,
        })
    }

    pub fn typ(&self) -> Type {
        self.data.typ()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:?} ttl={} {:?}", self.name, self.typ(), self.ttl, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns_parser::write_name;
    use std::net::Ipv4Addr;

    fn record_bytes(name: &str, typ: u16, class: u16, ttl: u32, rdata: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_name(name, &mut buf).unwrap();
        buf.extend_from_slice(&typ.to_be_bytes());
        buf.extend_from_slice(&class.to_be_bytes());
        buf.extend_from_slice(&ttl.to_be_bytes());
        buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        buf.extend_from_slice(rdata);
        buf
    }

    #[test]
    fn parse_question() {
        let mut buf = Vec::new();
        write_name("_http._tcp.local.", &mut buf).unwrap();
        buf.extend_from_slice(b"\x00\x0c\x80\x01");

        let question = Question::parse(&mut Reader::new(&buf)).unwrap();
        assert_eq!(question.qname, "_http._tcp.local.");
        assert_eq!(question.qtype, QueryType::PTR);
        assert_eq!(question.qclass, QueryClass::IN);
    }

    #[test]
    fn browse_question_name() {
        let service = ServiceType::from_name("_http._tcp").unwrap();
        let question = Question::browse(&service, &Domain::local());
        assert_eq!(question.qname, "_http._tcp.local.");
        assert_eq!(question.qtype, QueryType::PTR);
        assert_eq!(question.qclass, QueryClass::IN);
    }

    #[test]
    fn encode_query() {
        let question = Question::new("_http._tcp.local.", QueryType::PTR, QueryClass::IN);
        let packet = question.encode().unwrap();
        let expected = b"\x00\x00\x00\x00\x00\x01\x00\x00\x00\x00\x00\x00\
                         \x05_http\x04_tcp\x05local\x00\x00\x0c\x80\x01";
        assert_eq!(&packet[..], &expected[..]);
    }

    #[test]
    fn parse_ptr_record_without_rdata() {
        let buf = record_bytes("_http._tcp.local.", 12, 1, 3600, b"");
        let mut reader = Reader::new(&buf);
        let record = ResourceRecord::parse(&mut reader).unwrap();
        assert_eq!(record.name, "_http._tcp.local.");
        assert_eq!(record.ttl, 3600);
        assert_eq!(record.data, RRData::PTR(String::new()));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn cache_flush_bit_is_masked() {
        let buf = record_bytes("zelda.local.", 1, 0x8001, 120, b"\x0a\x00\x00\x01");
        let record = ResourceRecord::parse(&mut Reader::new(&buf)).unwrap();
        assert_eq!(record.cls, Class::IN);
        assert_eq!(record.data, RRData::A(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn unsupported_record_type() {
        // NSEC
        let buf = record_bytes("zelda.local.", 47, 0x8001, 120, b"\xc0\x0c\x00\x01\x40");
        assert!(matches!(
            ResourceRecord::parse(&mut Reader::new(&buf)),
            Err(Error::UnsupportedRecordType(47))
        ));
    }

    #[test]
    fn cursor_lands_after_rdata() {
        let mut buf = record_bytes("Zelda._http._tcp.local.", 16, 1, 2600, b"\x05a=b=c");
        let first_len = buf.len();
        buf.extend(record_bytes("zelda.local.", 1, 1, 120, b"\x0a\x00\x00\x02"));

        let mut reader = Reader::new(&buf);
        ResourceRecord::parse(&mut reader).unwrap();
        assert_eq!(reader.position(), first_len);
        let second = ResourceRecord::parse(&mut reader).unwrap();
        assert_eq!(second.data, RRData::A(Ipv4Addr::new(10, 0, 0, 2)));
    }

    #[test]
    fn question_answered_by_exact_name_only() {
        let question = Question::new("_http._tcp.local.", QueryType::PTR, QueryClass::IN);
        let ptr = ResourceRecord::new(
            "_http._tcp.local.",
            2600,
            RRData::PTR("Zelda._http._tcp.local.".into()),
        );
        let other = ResourceRecord::new(
            "_HTTP._tcp.local.",
            2600,
            RRData::PTR("Link._http._tcp.local.".into()),
        );
        assert!(question.answered_by(&ptr));
        assert!(!question.answered_by(&other));
    }
}

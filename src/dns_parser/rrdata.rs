use std::collections::BTreeMap;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, WriteBytesExt};

use super::{write_name, Error, Reader, Type};

/// Shown for a PTR record whose target has no usable first label
pub const UNTITLED_NAME: &str = "Untitled";

/// The enumeration that represents known types of DNS resource records data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RRData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    PTR(String),
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    TXT(BTreeMap<String, String>),
}

impl RRData {
    pub fn typ(&self) -> Type {
        match *self {
            RRData::A(..) => Type::A,
            RRData::AAAA(..) => Type::AAAA,
            RRData::PTR(..) => Type::PTR,
            RRData::SRV { .. } => Type::SRV,
            RRData::TXT(..) => Type::TXT,
        }
    }

    /// First label of a PTR target, the part a person would recognise
    pub fn user_visible_name(&self) -> Option<&str> {
        match *self {
            RRData::PTR(ref ptr_name) => Some(user_visible_name(ptr_name)),
            _ => None,
        }
    }

    /// Reads the type specific payload of `rdlength` bytes at the reader's position
    ///
    /// The reader is left right after the payload even if the payload itself
    /// was shorter than announced.
    pub fn parse(typ: Type, reader: &mut Reader, rdlength: usize) -> Result<RRData, Error> {
        let start = reader.position();
        let end = start + rdlength;
        if rdlength > reader.remaining() {
            return Err(Error::UnexpectedEOF);
        }

        let data = match typ {
            Type::A => {
                if rdlength != 4 {
                    return Err(Error::InvalidAddress);
                }
                RRData::A(Ipv4Addr::from(reader.read_u32()?))
            }
            Type::AAAA => {
                if rdlength != 16 {
                    return Err(Error::InvalidAddress);
                }
                let mut octets = [0u8; 16];
                octets.copy_from_slice(reader.read_bytes(16)?);
                RRData::AAAA(Ipv6Addr::from(octets))
            }
            Type::PTR => {
                if rdlength == 0 {
                    RRData::PTR(String::new())
                } else {
                    RRData::PTR(reader.read_name()?)
                }
            }
            Type::SRV => {
                if rdlength < 7 {
                    return Err(Error::UnexpectedEOF);
                }
                RRData::SRV {
                    priority: reader.read_u16()?,
                    weight: reader.read_u16()?,
                    port: reader.read_u16()?,
                    target: reader.read_name()?,
                }
            }
            Type::TXT => RRData::TXT(parse_txt(reader.read_bytes(rdlength)?)?),
        };

        reader.set_position(end)?;
        Ok(data)
    }

    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> Result<(), Error> {
        match *self {
            RRData::A(ip) => writer.write_u32::<BigEndian>(ip.into())?,
            RRData::AAAA(ip) => writer.write_all(&ip.octets())?,
            RRData::PTR(ref name) => write_name(name, writer)?,
            RRData::SRV {
                priority,
                weight,
                port,
                ref target,
            } => {
                writer.write_u16::<BigEndian>(priority)?;
                writer.write_u16::<BigEndian>(weight)?;
                writer.write_u16::<BigEndian>(port)?;
                write_name(target, writer)?;
            }
            RRData::TXT(ref attributes) => {
                if attributes.is_empty() {
                    writer.write_u8(0)?;
                }
                for (key, value) in attributes {
                    let entry = format!("{}={}", key, value);
                    if entry.len() > 255 {
                        return Err(Error::LabelTooLong(entry.len()));
                    }
                    writer.write_u8(entry.len() as u8)?;
                    writer.write_all(entry.as_bytes())?;
                }
            }
        }
        Ok(())
    }
}

pub fn user_visible_name(ptr_name: &str) -> &str {
    match ptr_name.split('.').next() {
        Some(label) if !label.is_empty() => label,
        _ => UNTITLED_NAME,
    }
}

/// Splits TXT data into `key=value` pairs
///
/// Each character-string is split on its first `=`, strings without one
/// become keys with an empty value. Per RFC 6763 section 6.4 the first
/// occurrence of a key wins.
fn parse_txt(rdata: &[u8]) -> Result<BTreeMap<String, String>, Error> {
    let mut attributes = BTreeMap::new();
    let mut pos = 0;
    while pos < rdata.len() {
        let len = usize::from(rdata[pos]);
        let entry = rdata
            .get(pos + 1..pos + 1 + len)
            .ok_or(Error::UnexpectedEOF)?;
        pos += 1 + len;
        if entry.is_empty() {
            continue;
        }
        let entry = String::from_utf8_lossy(entry);
        let (key, value) = match entry.find('=') {
            Some(idx) => (&entry[..idx], &entry[idx + 1..]),
            None => (&entry[..], ""),
        };
        attributes
            .entry(key.to_owned())
            .or_insert_with(|| value.to_owned());
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(typ: Type, rdata: &[u8]) -> Result<RRData, Error> {
        let mut reader = Reader::new(rdata);
        let data = RRData::parse(typ, &mut reader, rdata.len())?;
        assert_eq!(reader.position(), rdata.len());
        Ok(data)
    }

    #[test]
    fn parse_a() {
        assert_eq!(
            parse(Type::A, b"\x0a\x00\x00\x01").unwrap(),
            RRData::A(Ipv4Addr::new(10, 0, 0, 1))
        );
        assert!(matches!(parse(Type::A, b"\x0a\x00\x00"), Err(Error::InvalidAddress)));
    }

    #[test]
    fn parse_aaaa() {
        let rdata = b"\xfe\x80\x00\x00\x00\x00\x00\x00\x92\x72\x40\xff\xfe\x05\xef\x68";
        assert_eq!(
            parse(Type::AAAA, rdata).unwrap(),
            RRData::AAAA("fe80::9272:40ff:fe05:ef68".parse().unwrap())
        );
        assert!(matches!(parse(Type::AAAA, &rdata[..4]), Err(Error::InvalidAddress)));
    }

    #[test]
    fn parse_srv() {
        let rdata = b"\x01\xf4\x00\x64\x00\x50\x05zelda\x05local\x00";
        assert_eq!(
            parse(Type::SRV, rdata).unwrap(),
            RRData::SRV {
                priority: 500,
                weight: 100,
                port: 80,
                target: "zelda.local.".into(),
            }
        );
    }

    #[test]
    fn parse_txt_entries() {
        let rdata = b"\x0dsoftware=Hola\x11platform=Mac OS X\x00";
        let data = parse(Type::TXT, rdata).unwrap();
        let attributes = match data {
            RRData::TXT(attributes) => attributes,
            other => panic!("unexpected data {:?}", other),
        };
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes["software"], "Hola");
        assert_eq!(attributes["platform"], "Mac OS X");
        assert!(!attributes.contains_key("version"));
    }

    #[test]
    fn txt_splits_on_first_equals_only() {
        let data = parse(Type::TXT, b"\x1bwaMA=90-72-40-05-EF-68,raMA\x04flag\x05waMA=").unwrap();
        let mut expected = BTreeMap::new();
        expected.insert("waMA".to_owned(), "90-72-40-05-EF-68,raMA".to_owned());
        expected.insert("flag".to_owned(), String::new());
        assert_eq!(data, RRData::TXT(expected));
    }

    #[test]
    fn txt_overrun_is_an_error() {
        assert!(matches!(parse(Type::TXT, b"\x09short"), Err(Error::UnexpectedEOF)));
    }

    #[test]
    fn empty_ptr_is_untitled() {
        let data = parse(Type::PTR, b"").unwrap();
        assert_eq!(data, RRData::PTR(String::new()));
        assert_eq!(data.user_visible_name(), Some(UNTITLED_NAME));
        assert_eq!(
            RRData::PTR("Zelda._http._tcp.local.".into()).user_visible_name(),
            Some("Zelda")
        );
    }

    #[test]
    fn payload_longer_than_buffer() {
        let mut reader = Reader::new(b"\x0a\x00");
        assert!(matches!(
            RRData::parse(Type::A, &mut reader, 4),
            Err(Error::UnexpectedEOF)
        ));
    }

    #[test]
    fn written_srv_reads_back() {
        let srv = RRData::SRV {
            priority: 0,
            weight: 0,
            port: 5009,
            target: "annuvin.local.".into(),
        };
        let mut buf = Vec::new();
        srv.write_to(&mut buf).unwrap();
        assert_eq!(parse(Type::SRV, &buf).unwrap(), srv);
    }
}

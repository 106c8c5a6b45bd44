//! Wire format of the DNS messages used by mDNS service discovery
//!
//! Only what a browsing client needs is here: building queries, and parsing
//! responses made of A, AAAA, PTR, SRV and TXT records.

mod builder;
mod enums;
mod error;
mod header;
mod name;
mod reader;
mod response;
mod rrdata;
mod structs;

pub use self::builder::{Builder, MoveTo, Questions};
#[cfg(test)]
pub use self::builder::{Additional, Answers};
pub use self::enums::{Class, QueryClass, QueryType, Type, CLASS_TOP_BIT};
pub use self::error::Error;
pub use self::header::Header;
pub use self::name::{read_name, write_name, MAX_LABEL_LEN};
pub use self::reader::Reader;
pub use self::response::Response;
pub use self::rrdata::{user_visible_name, RRData, UNTITLED_NAME};
pub use self::structs::{Question, ResourceRecord};

/// Largest mDNS message we'll read, RFC 6762 section 17
pub const MAX_MESSAGE_LEN: usize = 9000;

/// Renders `data` as hex, two bytes per group and sixteen per line
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            if i % 16 == 0 {
                out.push('\n');
            } else if i % 2 == 0 {
                out.push(' ');
            }
        }
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::hex_dump;

    #[test]
    fn dump_groups_bytes() {
        assert_eq!(hex_dump(b""), "");
        assert_eq!(hex_dump(b"\x00\x01\xc0\x0c\xff"), "0001 c00c ff");
        let line = hex_dump(&[0xab; 18]);
        assert_eq!(line.lines().count(), 2);
        assert!(line.ends_with("\nabab"));
    }
}

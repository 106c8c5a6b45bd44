use std::collections::BTreeMap;
use std::net::IpAddr;

use log::trace;

use super::{Error, Header, Question, RRData, Reader, ResourceRecord};

/// Root name, type and class
const MIN_QUESTION_LEN: usize = 5;
/// Root name, type, class, ttl and rdlength
const MIN_RECORD_LEN: usize = 11;

/// Entries to reserve room for, no more than the bytes left could hold
fn capacity_for(count: usize, remaining: usize, min_len: usize) -> usize {
    count.min(remaining / min_len)
}

/// Parsed mDNS response
///
/// Records from the answer, authority and additional sections end up in one
/// list, in that order. Nothing downstream cares which section a record came
/// from.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub header: Header,
    pub questions: Vec<Question>,
    pub records: Vec<ResourceRecord>,
}

impl Response {
    pub fn parse(data: &[u8]) -> Result<Response, Error> {
        let mut reader = Reader::new(data);
        let header = Header::parse(&mut reader)?;
        if !header.is_response() {
            return Err(Error::NotAResponse);
        }
        if header.opcode() != 0 || header.response_code() != 0 {
            return Err(Error::UnsupportedOpcodeOrRcode);
        }
        if header.truncated() {
            trace!("response is truncated, more known answers will follow");
        }

        let mut questions = Vec::with_capacity(capacity_for(
            usize::from(header.questions),
            reader.remaining(),
            MIN_QUESTION_LEN,
        ));
        for _ in 0..header.questions {
            questions.push(Question::parse(&mut reader)?);
        }

        let num_records = usize::from(header.answers)
            + usize::from(header.nameservers)
            + usize::from(header.additional);
        let mut records =
            Vec::with_capacity(capacity_for(num_records, reader.remaining(), MIN_RECORD_LEN));
        for _ in 0..num_records {
            records.push(ResourceRecord::parse(&mut reader)?);
        }

        Ok(Response {
            header,
            questions,
            records,
        })
    }

    /// Whether any record is named like one of `questions`
    pub fn answers<'a, I>(&self, questions: I) -> bool
    where
        I: IntoIterator<Item = &'a Question>,
    {
        questions
            .into_iter()
            .any(|question| self.records.iter().any(|record| question.answered_by(record)))
    }

    /// Adds the records of `other` that this response doesn't have yet
    pub fn merge_with(&mut self, other: Response) {
        for record in other.records {
            if !self.records.contains(&record) {
                self.records.push(record);
            }
        }
    }

    pub fn records_for<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ResourceRecord> + 'a {
        self.records.iter().filter(move |record| record.name == name)
    }

    pub fn has_srv_for(&self, name: &str) -> bool {
        self.srv_for(name).is_some()
    }

    pub fn has_txt_for(&self, name: &str) -> bool {
        self.txt_for(name).is_some()
    }

    pub fn has_address_for(&self, name: &str) -> bool {
        self.addresses_for(name).next().is_some()
    }

    /// PTR records as `(record name, target)` pairs
    pub fn ptr_records(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records.iter().filter_map(|record| match record.data {
            RRData::PTR(ref target) => Some((record.name.as_str(), target.as_str())),
            _ => None,
        })
    }

    /// Targets of all SRV records
    pub fn srv_targets(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(|record| match record.data {
            RRData::SRV { ref target, .. } => Some(target.as_str()),
            _ => None,
        })
    }

    /// First SRV record named `name`, as `(port, target)`
    pub fn srv_for(&self, name: &str) -> Option<(u16, &str)> {
        self.records
            .iter()
            .filter(|record| record.name == name)
            .find_map(|record| match record.data {
                RRData::SRV {
                    port, ref target, ..
                } => Some((port, target.as_str())),
                _ => None,
            })
    }

    /// Attributes of the first TXT record named `name`
    pub fn txt_for(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.records
            .iter()
            .filter(|record| record.name == name)
            .find_map(|record| match record.data {
                RRData::TXT(ref attributes) => Some(attributes),
                _ => None,
            })
    }

    /// Addresses of every A and AAAA record named `name`
    pub fn addresses_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = IpAddr> + 'a {
        self.records_for(name).filter_map(|record| match record.data {
            RRData::A(ip) => Some(IpAddr::V4(ip)),
            RRData::AAAA(ip) => Some(IpAddr::V6(ip)),
            _ => None,
        })
    }

    /// Instance name from the first PTR record, if there is one
    pub fn user_visible_name(&self) -> Option<&str> {
        self.records
            .iter()
            .find_map(|record| record.data.user_visible_name())
    }

    /// Port of the first SRV record, if there is one
    pub fn port(&self) -> Option<u16> {
        self.records.iter().find_map(|record| match record.data {
            RRData::SRV { port, .. } => Some(port),
            _ => None,
        })
    }

    /// Every A and AAAA address in the response
    pub fn addresses(&self) -> Vec<IpAddr> {
        self.records
            .iter()
            .filter_map(|record| match record.data {
                RRData::A(ip) => Some(IpAddr::V4(ip)),
                RRData::AAAA(ip) => Some(IpAddr::V6(ip)),
                _ => None,
            })
            .collect()
    }

    /// Attributes of the first TXT record, empty when there is none
    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.records
            .iter()
            .find_map(|record| match record.data {
                RRData::TXT(ref attributes) => Some(attributes.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn num_questions(&self) -> u16 {
        self.header.questions
    }

    pub fn num_answers(&self) -> u16 {
        self.header.answers
    }

    pub fn num_nameservers(&self) -> u16 {
        self.header.nameservers
    }

    pub fn num_additional(&self) -> u16 {
        self.header.additional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns_parser::{write_name, Builder, QueryClass, QueryType};
    use std::net::{Ipv4Addr, Ipv6Addr};

    /// One PTR answer whose target is compressed against the question-less
    /// record name at offset 12
    fn zelda_packet() -> Vec<u8> {
        let mut buf = b"\x00\x00\x84\x00\x00\x00\x00\x01\x00\x00\x00\x00".to_vec();
        write_name("Zelda._http._tcp.local", &mut buf).unwrap();
        buf.extend_from_slice(b"\x00\x0c\x00\x01\x00\x00\x0a\x28\x00\x02\xc0\x0c");
        buf
    }

    fn full_packet() -> Vec<u8> {
        let ptr = ResourceRecord::new(
            "_http._tcp.local.",
            2600,
            RRData::PTR("Zelda._http._tcp.local.".into()),
        );
        let srv = ResourceRecord::new(
            "Zelda._http._tcp.local.",
            120,
            RRData::SRV {
                priority: 0,
                weight: 0,
                port: 8080,
                target: "zelda.local.".into(),
            },
        );
        let mut attributes = BTreeMap::new();
        attributes.insert("path".to_owned(), "/".to_owned());
        let txt = ResourceRecord::new("Zelda._http._tcp.local.", 4500, RRData::TXT(attributes));
        let a = ResourceRecord::new("zelda.local.", 120, RRData::A(Ipv4Addr::new(10, 0, 0, 7)));
        Builder::new_response(0, true)
            .add_answer(&ptr)
            .unwrap()
            .add_additional(&srv)
            .unwrap()
            .add_additional(&txt)
            .unwrap()
            .add_additional(&a)
            .unwrap()
            .build()
    }

    #[test]
    fn parse_compressed_ptr() {
        let response = Response::parse(&zelda_packet()).unwrap();
        assert_eq!(response.num_questions(), 0);
        assert_eq!(response.num_answers(), 1);
        assert_eq!(response.num_nameservers(), 0);
        assert_eq!(response.num_additional(), 0);
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0].name, "Zelda._http._tcp.local.");
        assert_eq!(response.records[0].ttl, 2600);
        assert_eq!(response.user_visible_name(), Some("Zelda"));
    }

    #[test]
    fn sections_are_flattened_in_order() {
        let response = Response::parse(&full_packet()).unwrap();
        assert_eq!(response.num_answers(), 1);
        assert_eq!(response.num_additional(), 3);
        let names: Vec<_> = response.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "_http._tcp.local.",
                "Zelda._http._tcp.local.",
                "Zelda._http._tcp.local.",
                "zelda.local.",
            ]
        );
        assert_eq!(response.port(), Some(8080));
        assert_eq!(response.addresses(), vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))]);
        assert_eq!(response.attributes()["path"], "/");
    }

    #[test]
    fn record_queries() {
        let response = Response::parse(&full_packet()).unwrap();
        assert!(response.has_srv_for("Zelda._http._tcp.local."));
        assert!(response.has_txt_for("Zelda._http._tcp.local."));
        assert!(!response.has_srv_for("zelda._http._tcp.local."));
        assert!(response.has_address_for("zelda.local."));
        assert!(!response.has_address_for("Zelda._http._tcp.local."));
        assert_eq!(
            response.srv_for("Zelda._http._tcp.local."),
            Some((8080, "zelda.local."))
        );
        assert_eq!(response.srv_targets().collect::<Vec<_>>(), vec!["zelda.local."]);
        assert_eq!(
            response.ptr_records().collect::<Vec<_>>(),
            vec![("_http._tcp.local.", "Zelda._http._tcp.local.")]
        );
        assert_eq!(response.records_for("zelda.local.").count(), 1);
    }

    #[test]
    fn answers_matches_record_names() {
        let response = Response::parse(&full_packet()).unwrap();
        let browse = Question::new("_http._tcp.local.", QueryType::PTR, QueryClass::IN);
        let unrelated = Question::new("_ipp._tcp.local.", QueryType::PTR, QueryClass::IN);
        assert!(response.answers(&[browse.clone()]));
        assert!(response.answers(&[unrelated.clone(), browse]));
        assert!(!response.answers(&[unrelated]));
        assert!(!response.answers(&[] as &[Question]));
    }

    #[test]
    fn merge_skips_duplicates() {
        let mut merged = Response::parse(&zelda_packet()).unwrap();
        merged.merge_with(Response::parse(&zelda_packet()).unwrap());
        assert_eq!(merged.records.len(), 1);

        merged.merge_with(Response::parse(&full_packet()).unwrap());
        assert_eq!(merged.records.len(), 5);

        let aaaa = ResourceRecord::new(
            "zelda.local.",
            120,
            RRData::AAAA(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 7)),
        );
        merged.merge_with(Response {
            records: vec![aaaa],
            ..Response::default()
        });
        assert_eq!(merged.addresses_for("zelda.local.").count(), 2);
    }

    #[test]
    fn queries_are_not_responses() {
        let query = Question::new("_http._tcp.local.", QueryType::PTR, QueryClass::IN)
            .encode()
            .unwrap();
        assert!(matches!(Response::parse(&query), Err(Error::NotAResponse)));
    }

    #[test]
    fn opcode_and_rcode_are_refused() {
        let mut packet = zelda_packet();
        packet[2] = 0x8c; // opcode 1
        assert!(matches!(
            Response::parse(&packet),
            Err(Error::UnsupportedOpcodeOrRcode)
        ));

        let mut packet = zelda_packet();
        packet[3] = 0x03; // NXDOMAIN
        assert!(matches!(
            Response::parse(&packet),
            Err(Error::UnsupportedOpcodeOrRcode)
        ));
    }

    #[test]
    fn header_counts_do_not_size_allocations() {
        assert_eq!(capacity_for(0xffff, 0, MIN_RECORD_LEN), 0);
        assert_eq!(capacity_for(0xffff * 3, 110, MIN_RECORD_LEN), 10);
        assert_eq!(capacity_for(2, 9000, MIN_QUESTION_LEN), 2);

        let inflated = b"\x00\x00\x84\x00\xff\xff\xff\xff\xff\xff\xff\xff";
        assert!(Response::parse(inflated).is_err());
    }

    #[test]
    fn truncated_packets_are_refused() {
        let packet = full_packet();
        assert!(Response::parse(&packet[..packet.len() - 3]).is_err());
        assert!(matches!(Response::parse(&packet[..5]), Err(Error::HeaderTooShort)));
        assert!(Response::parse(b"GET / HTTP/1.1\r\nHost: zelda.local\r\n\r\n").is_err());
    }
}

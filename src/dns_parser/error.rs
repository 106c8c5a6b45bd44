use std::io;

use thiserror::Error;

/// Error parsing or building a DNS packet
#[derive(Debug, Error)]
pub enum Error {
    #[error("packet is smaller than header size")]
    HeaderTooShort,
    #[error("packet has incomplete data")]
    UnexpectedEOF,
    #[error("domain name is malformed")]
    MalformedName,
    #[error("invalid characters encountered while reading label")]
    LabelIsNotUtf8,
    #[error("label of {0} bytes is too long for a domain name")]
    LabelTooLong(usize),
    #[error("record type {0} is not supported")]
    UnsupportedRecordType(u16),
    #[error("class {0} is invalid")]
    InvalidClass(u16),
    #[error("query type {0} is invalid")]
    InvalidQueryType(u16),
    #[error("query class {0} is invalid")]
    InvalidQueryClass(u16),
    #[error("address record has wrong (too short or too long) RDATA")]
    InvalidAddress,
    #[error("packet is not a DNS response")]
    NotAResponse,
    #[error("mDNS responses can't carry OPCODE or RCODE values")]
    UnsupportedOpcodeOrRcode,
    #[error("too many entries in a single section")]
    TooManyEntries,
    #[error("failed to write packet: {0}")]
    Write(#[from] io::Error),
}

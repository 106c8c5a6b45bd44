use std::fmt;

use super::Error;

/// Top bit of the class field: "unicast response" in questions,
/// "cache flush" in records (RFC 6762 sections 5.4 and 10.2)
pub const CLASS_TOP_BIT: u16 = 0x8000;

/// The record types this client understands
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Type {
    A = 1,
    PTR = 12,
    TXT = 16,
    AAAA = 28,
    SRV = 33,
}

impl Type {
    pub fn parse(code: u16) -> Result<Type, Error> {
        use self::Type::*;
        match code {
            1 => Ok(A),
            12 => Ok(PTR),
            16 => Ok(TXT),
            28 => Ok(AAAA),
            33 => Ok(SRV),
            x => Err(Error::UnsupportedRecordType(x)),
        }
    }
}

/// The QTYPE field of a question
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum QueryType {
    A = 1,
    NS = 2,
    CNAME = 5,
    SOA = 6,
    MB = 7,
    MG = 8,
    MR = 9,
    NULL = 10,
    WKS = 11,
    PTR = 12,
    HINFO = 13,
    MINFO = 14,
    MX = 15,
    TXT = 16,
    AAAA = 28,
    SRV = 33,
    All = 255,
}

impl QueryType {
    pub fn parse(code: u16) -> Result<QueryType, Error> {
        use self::QueryType::*;
        match code {
            1 => Ok(A),
            2 => Ok(NS),
            5 => Ok(CNAME),
            6 => Ok(SOA),
            7 => Ok(MB),
            8 => Ok(MG),
            9 => Ok(MR),
            10 => Ok(NULL),
            11 => Ok(WKS),
            12 => Ok(PTR),
            13 => Ok(HINFO),
            14 => Ok(MINFO),
            15 => Ok(MX),
            16 => Ok(TXT),
            28 => Ok(AAAA),
            33 => Ok(SRV),
            255 => Ok(All),
            x => Err(Error::InvalidQueryType(x)),
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QueryType::All => f.write_str("ANY"),
            other => fmt::Debug::fmt(&other, f),
        }
    }
}

/// The CLASS field of a resource record
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Class {
    IN = 1,
}

impl Class {
    /// Parses a class field with the cache flush bit already masked off
    pub fn parse(code: u16) -> Result<Class, Error> {
        match code {
            1 => Ok(Class::IN),
            x => Err(Error::InvalidClass(x)),
        }
    }
}

/// The QCLASS field of a question
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum QueryClass {
    IN = 1,
    Any = 255,
}

impl QueryClass {
    /// Parses a qclass field with the unicast response bit already masked off
    pub fn parse(code: u16) -> Result<QueryClass, Error> {
        match code {
            1 => Ok(QueryClass::IN),
            255 => Ok(QueryClass::Any),
            x => Err(Error::InvalidQueryClass(x)),
        }
    }
}

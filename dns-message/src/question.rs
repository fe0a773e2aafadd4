use crate::{encode_name, Result};
use bytes::BufMut;
use std::default::Default;
use std::fmt;
use std::str::FromStr;

use tracing::{instrument, trace};

#[derive(Debug, Clone, PartialEq)]
/// The question section is used to carry the "question" in most queries, i.e.,
/// the parameters that define what is being asked.
pub struct Question {
    /// RFC1035 - a domain name represented as a sequence of labels, where each
    /// label consists of a length octet followed by that number of octets.  The
    /// domain name terminates with the zero length octet for the null label of
    /// the root.
    pub q_name: Vec<String>,

    /// RFC1035 - a two octet code which specifies the type of the query.
    pub q_type: Type,

    /// RFC1035 - a two octet code that specifies the [`Class`] of the query.
    pub q_class: Class,
}

impl Question {
    pub(crate) fn to_bytes(&self, buf: &mut Vec<u8>) -> Result<usize> {
        encode_question(&self.q_name, self.q_type, self.q_class, buf)
    }
}

/// Writes QNAME, QTYPE and QCLASS for a single question entry.
#[instrument(skip(labels, buf))]
pub fn encode_question<S: AsRef<str>>(
    labels: &[S],
    q_type: Type,
    q_class: Class,
    buf: &mut Vec<u8>,
) -> Result<usize> {
    let byte_count = encode_name(labels, buf)? + 4;
    buf.put_u16(q_type.into());
    buf.put_u16(q_class.into());

    trace!("Wrote {} bytes", byte_count);

    Ok(byte_count)
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Types used in [`Question`]s.
pub enum Type {
    /// RFC1035 - (1) a host address.
    A,

    /// RFC1035 - (2) an authoritative name server.
    NS,

    /// RFC1035 - (5) the canonical name for an alias.
    CNAME,

    /// RFC1035 - (6) marks the start of a zone of authority.
    SOA,

    /// RFC1035 - (12) a domain name pointer.
    PTR,

    /// RFC1035 - (15) mail exchange.
    MX,

    /// RFC1035 - (16) text strings.
    TXT,

    /// RFC3596 - (28) a single IPv6 address.
    AAAA,

    /// RFC2782 - (33) service location.
    SRV,

    /// RFC1035 - (255) A request for all records.
    ANY,

    /// An unknown [`Type`] - the value is contained within.
    Unknown(u16),
}

impl Default for Type {
    fn default() -> Self {
        Self::A
    }
}

impl From<Type> for u16 {
    fn from(t: Type) -> u16 {
        match t {
            Type::A => 1,
            Type::NS => 2,
            Type::CNAME => 5,
            Type::SOA => 6,
            Type::PTR => 12,
            Type::MX => 15,
            Type::TXT => 16,
            Type::AAAA => 28,
            Type::SRV => 33,
            Type::ANY => 255,
            Type::Unknown(i) => i,
        }
    }
}

impl From<u16> for Type {
    fn from(val: u16) -> Self {
        match val {
            1 => Type::A,
            2 => Type::NS,
            5 => Type::CNAME,
            6 => Type::SOA,
            12 => Type::PTR,
            15 => Type::MX,
            16 => Type::TXT,
            28 => Type::AAAA,
            33 => Type::SRV,
            255 => Type::ANY,
            _ => Type::Unknown(val),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        let disp = match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::PTR => "PTR",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::AAAA => "AAAA",
            Self::SRV => "SRV",
            Self::ANY => "ANY",
            Self::Unknown(i) => return write!(f, "TYPE{}", i),
        };
        write!(f, "{}", disp)
    }
}

impl FromStr for Type {
    type Err = String;

    /// Accepts a mnemonic (`aaaa`, `MX`, `*`) or a decimal code (`28`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u16>() {
            return Ok(Type::from(code));
        }
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Type::A),
            "NS" => Ok(Type::NS),
            "CNAME" => Ok(Type::CNAME),
            "SOA" => Ok(Type::SOA),
            "PTR" => Ok(Type::PTR),
            "MX" => Ok(Type::MX),
            "TXT" => Ok(Type::TXT),
            "AAAA" => Ok(Type::AAAA),
            "SRV" => Ok(Type::SRV),
            "ANY" | "*" => Ok(Type::ANY),
            _ => Err(format!("unknown query type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// The class of the query - you will want [`Class::IN`] (the default) 99.99% of
/// the time.
pub enum Class {
    /// RFC1035 - 1 the Internet.
    IN,

    /// RFC1035 - 2 the CSNET class (Obsolete - used only for examples in some
    /// obsolete RFCs)
    CS,

    /// RFC1035 - 3 the CHAOS class.
    CH,

    /// RFC1035 - 4 Hesiod [Dyer 87].
    HS,

    /// RFC1035 - 255 any class.
    ANY,

    /// An unknown class - contained within.
    Unknown(u16),
}

impl Default for Class {
    fn default() -> Self {
        Class::IN
    }
}

impl From<Class> for u16 {
    fn from(c: Class) -> u16 {
        match c {
            Class::IN => 1,
            Class::CS => 2,
            Class::CH => 3,
            Class::HS => 4,
            Class::ANY => 255,
            Class::Unknown(i) => i,
        }
    }
}

impl From<u16> for Class {
    fn from(val: u16) -> Self {
        match val {
            1 => Class::IN,
            2 => Class::CS,
            3 => Class::CH,
            4 => Class::HS,
            255 => Class::ANY,
            _ => Class::Unknown(val),
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        match self {
            Class::IN => write!(f, "IN"),
            Class::CS => write!(f, "CS"),
            Class::CH => write!(f, "CH"),
            Class::HS => write!(f, "HS"),
            Class::ANY => write!(f, "ANY"),
            Class::Unknown(i) => write!(f, "CLASS{}", i),
        }
    }
}

impl FromStr for Class {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u16>() {
            return Ok(Class::from(code));
        }
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(Class::IN),
            "CS" => Ok(Class::CS),
            "CH" => Ok(Class::CH),
            "HS" => Ok(Class::HS),
            "ANY" | "*" => Ok(Class::ANY),
            _ => Err(format!("unknown query class: {}", s)),
        }
    }
}

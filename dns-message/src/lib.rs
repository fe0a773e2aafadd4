//! Encoding and decoding of DNS queries as per RFC1035.
//!
//! Queries (header plus a single question) are encoded in full. Responses
//! only have their fixed header decoded; the remainder is kept as opaque
//! bytes. Name compression is not supported in either direction.

mod builder;
mod error;
mod header;
mod message;
mod name;
mod parser;
mod question;

pub use builder::{HeaderBuilder, QueryBuilder};
pub use error::MessageError;
pub use header::{Header, OpCode, RCode};
pub use message::{Query, Response};
pub use name::{decode_name, encode_name, split_name, MAX_LABEL_LEN, MAX_NAME_LEN};
pub use question::{encode_question, Class, Question, Type};

pub type Result<T> = std::result::Result<T, MessageError>;

/// Length of the fixed DNS message header in octets.
pub const HEADER_LEN: usize = 12;

/// Encodes a standard query for a single question: QDCOUNT is one, every
/// other count, flag and the opcode are zero except RD.
pub fn build_query<S: AsRef<str>>(
    id: u16,
    labels: &[S],
    q_type: Type,
    q_class: Class,
    recursion_desired: bool,
) -> Result<Vec<u8>> {
    let query = QueryBuilder::new()
        .id(id)
        .labels(labels)
        .q_type(q_type)
        .class(q_class)
        .rd(recursion_desired)
        .build();

    let mut buf = Vec::with_capacity(512);
    query.to_bytes(&mut buf)?;
    Ok(buf)
}

use crate::{Header, Question, Result, HEADER_LEN};
use bytes::Bytes;
use std::fmt;
use tracing::{instrument, trace};

/// A query message: the header followed by exactly one question.
///
/// These can be constructed with a [`crate::QueryBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub header: Header,
    pub question: Question,
}

impl Query {
    /// Serializes the query into the provided buffer, returning the number of
    /// bytes written to the buffer.
    ///
    /// On error the buffer is left as it was.
    #[instrument(skip(self, buf), fields(id = self.header.id))]
    pub fn to_bytes(&self, buf: &mut Vec<u8>) -> Result<usize> {
        let start = buf.len();
        let mut byte_count = self.header.to_bytes(buf)?;
        match self.question.to_bytes(buf) {
            Ok(n) => byte_count += n,
            Err(e) => {
                buf.truncate(start);
                return Err(e);
            }
        }

        trace!("Wrote {} bytes", byte_count);

        Ok(byte_count)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::result::Result<(), fmt::Error> {
        write!(
            f,
            "Query(id:{}) - {}. {} {}",
            self.header.id,
            self.question.q_name.join("."),
            self.question.q_class,
            self.question.q_type
        )
    }
}

/// A received message. Only the header is decoded, everything after it
/// (question echo and resource records) is kept verbatim in `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub header: Header,
    pub body: Bytes,
}

impl Response {
    /// Decodes the header of `input` and keeps the rest as the body.
    #[instrument(skip(input))]
    pub fn from_bytes(input: &[u8]) -> Result<Response> {
        let header = Header::from_bytes(input)?;
        let body = Bytes::copy_from_slice(&input[HEADER_LEN..]);

        trace!("Read response {} with {} body bytes", header.id, body.len());

        Ok(Response { header, body })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::result::Result<(), fmt::Error> {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "BODY")?;
        write!(f, "\t{:?}", self.body)
    }
}

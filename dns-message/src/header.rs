use crate::{parser, MessageError, Result, HEADER_LEN};
use bytes::BufMut;
use std::default::Default;
use std::fmt;
use tracing::{instrument, trace};

const MAX_NIBBLE: u16 = 0xf;

#[derive(Debug, Clone, PartialEq, Default)]
/// The DNS Message Header as per RFC1035.
pub struct Header {
    /// RFC1035 - A 16 bit identifier assigned by the program that generates any
    /// kind of query. This identifier is copied the corresponding reply and
    /// can be used by the requester to match up replies to outstanding queries.
    pub id: u16,

    /// RFC1035 - A one bit field that specifies whether this message is a query
    /// (0), or a response (1).
    pub qr: bool,

    /// RFC1035 -  A four bit field that specifies kind of query in this
    /// message.  This value is set by the originator of a query and copied into
    /// the response.
    pub opcode: OpCode,

    /// RFC1035 - Authoritative Answer - this bit is valid in responses, and
    /// specifies that the responding name server is an authority for the domain
    /// name in question section.
    pub aa: bool,

    /// RFC1035 - TrunCation - specifies that this message was truncated due to
    /// length greater than that permitted on the transmission channel.
    pub tc: bool,

    /// RFC1035 - Recursion Desired - this bit may be set in a query and is
    /// copied into the response. If RD is set, it directs the name server to
    /// pursue the query recursively.
    pub rd: bool,

    /// RFC1035 - Recursion Available - this be is set or cleared in a response,
    /// and denotes whether recursive query support is available in the name
    /// server.
    pub ra: bool,

    /// RFC1035 - Reserved for future use, three bits wide. Decoding keeps it
    /// verbatim, so responders that set the RFC2535 AD/CD bits land here.
    /// Encoding only accepts zero.
    pub z: u8,

    /// RFC1035 - Response code - this 4 bit field is set as part of responses.
    pub rcode: RCode,

    /// Number of entries in the question section.
    pub qd_count: u16,

    /// Number of resource records in the answer section.
    pub an_count: u16,

    /// Number of name server resource records in the authority section.
    pub ns_count: u16,

    /// Number of resource records in the additional records section.
    pub ar_count: u16,
}

impl Header {
    /// Decodes the first 12 octets of `input`. Anything past the header is
    /// ignored.
    #[instrument(skip(input))]
    pub fn from_bytes(input: &[u8]) -> Result<Header> {
        if input.len() < HEADER_LEN {
            return Err(MessageError::TruncatedMessage {
                needed: HEADER_LEN,
                available: input.len(),
            });
        }
        let (_, header) = parser::read_header(input)?;

        trace!("Read header: id {}", header.id);

        Ok(header)
    }

    /// Packs the header into its 12 octet wire form, appending it to `buf`.
    ///
    /// Every field is range checked first so nothing is written to `buf`
    /// when a field is too wide for its bits or Z is not zero.
    #[instrument(skip(buf))]
    pub fn to_bytes(&self, buf: &mut Vec<u8>) -> Result<usize> {
        let opcode = self.opcode.as_u8()?;
        let rcode = self.rcode.as_u8()?;
        if self.z != 0 {
            return Err(MessageError::InvalidField {
                field: "z",
                value: self.z.into(),
                max: 0,
            });
        }

        buf.put_u16(self.id);

        let mut val = 0u8;
        if self.qr {
            val |= 1 << 7;
        }
        val |= opcode << 3;
        if self.aa {
            val |= 1 << 2;
        }
        if self.tc {
            val |= 1 << 1;
        }
        if self.rd {
            val |= 1;
        }
        buf.put_u8(val);

        val = 0;
        if self.ra {
            val |= 1 << 7;
        }
        val |= rcode;
        buf.put_u8(val);

        buf.put_u16(self.qd_count);
        buf.put_u16(self.an_count);
        buf.put_u16(self.ns_count);
        buf.put_u16(self.ar_count);

        trace!("Wrote {} bytes", HEADER_LEN);

        Ok(HEADER_LEN)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        writeln!(f, "HEADER")?;
        writeln!(f, "\tid {}", self.id)?;
        writeln!(f, "\tqr {}", self.qr as u8)?;
        writeln!(f, "\topcode {}", self.opcode)?;
        writeln!(f, "\taa {}", self.aa as u8)?;
        writeln!(f, "\ttc {}", self.tc as u8)?;
        writeln!(f, "\trd {}", self.rd as u8)?;
        writeln!(f, "\tra {}", self.ra as u8)?;
        writeln!(f, "\trcode {}", self.rcode)?;
        writeln!(f, "\tqdcount {}", self.qd_count)?;
        writeln!(f, "\tancount {}", self.an_count)?;
        writeln!(f, "\tnscount {}", self.ns_count)?;
        write!(f, "\tarcount {}", self.ar_count)
    }
}

#[derive(Debug, Clone, Copy)]
/// A four bit field that specifies kind of query in this message.  This value
/// is set by the originator of a query and copied into the response.
///
/// Equality is on the numeric code, so `Unknown(0)` equals `Query`.
pub enum OpCode {
    /// A standard query.
    Query,

    /// An inverse query.
    IQuery,

    /// A server status request.
    Status,

    /// RFC1996 - zone change notification.
    Notify,

    /// RFC2136 - dynamic update.
    Update,

    /// An unknown OpCode (contained within).
    Unknown(u8),
}

impl OpCode {
    fn code(&self) -> u8 {
        match self {
            OpCode::Query => 0,
            OpCode::IQuery => 1,
            OpCode::Status => 2,
            OpCode::Notify => 4,
            OpCode::Update => 5,
            OpCode::Unknown(opcode) => *opcode,
        }
    }

    pub(crate) fn as_u8(&self) -> Result<u8> {
        let opcode = self.code();
        if u16::from(opcode) > MAX_NIBBLE {
            // OpCodes can only be 4 bits wide.
            return Err(MessageError::InvalidField {
                field: "opcode",
                value: opcode.into(),
                max: MAX_NIBBLE,
            });
        }
        Ok(opcode)
    }
}

impl PartialEq for OpCode {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for OpCode {}

impl From<u8> for OpCode {
    fn from(val: u8) -> Self {
        match val {
            0 => OpCode::Query,
            1 => OpCode::IQuery,
            2 => OpCode::Status,
            4 => OpCode::Notify,
            5 => OpCode::Update,
            n => OpCode::Unknown(n),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        match self {
            OpCode::Query => write!(f, "0 (QUERY)"),
            OpCode::IQuery => write!(f, "1 (IQUERY)"),
            OpCode::Status => write!(f, "2 (STATUS)"),
            OpCode::Notify => write!(f, "4 (NOTIFY)"),
            OpCode::Update => write!(f, "5 (UPDATE)"),
            OpCode::Unknown(n) => write!(f, "{}", n),
        }
    }
}

impl Default for OpCode {
    fn default() -> Self {
        OpCode::Query
    }
}

#[derive(Debug, Clone, Copy)]
/// Response code - this 4 bit field is set as part of responses.
///
/// Equality is on the numeric code, so `Unknown(3)` equals `NameError`.
pub enum RCode {
    /// No error condition.
    NoError,

    /// Format error - The name server was unable to interpret the query.
    FormatError,

    /// Server failure - The name server was unable to process this query due to
    /// a problem with the name server.
    ServerFailure,

    /// Name Error - Meaningful only for responses from an authoritative name
    /// server, this code signifies that the domain name referenced in the query
    /// does not exist.
    NameError,

    /// Not Implemented - The name server does not support the requested kind of
    /// query.
    NotImplemented,

    /// Refused - The name server refuses to perform the specified operation for
    /// policy reasons.
    Refused,

    /// The response code was unknown (contained within).
    Unknown(u8),
}

impl RCode {
    fn code(&self) -> u8 {
        match self {
            RCode::NoError => 0,
            RCode::FormatError => 1,
            RCode::ServerFailure => 2,
            RCode::NameError => 3,
            RCode::NotImplemented => 4,
            RCode::Refused => 5,
            RCode::Unknown(i) => *i,
        }
    }

    pub(crate) fn as_u8(&self) -> Result<u8> {
        match self.code() {
            i if u16::from(i) > MAX_NIBBLE => Err(MessageError::InvalidField {
                field: "rcode",
                value: i.into(),
                max: MAX_NIBBLE,
            }),
            i => Ok(i),
        }
    }
}

impl PartialEq for RCode {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for RCode {}

impl From<u8> for RCode {
    fn from(val: u8) -> Self {
        match val {
            0 => RCode::NoError,
            1 => RCode::FormatError,
            2 => RCode::ServerFailure,
            3 => RCode::NameError,
            4 => RCode::NotImplemented,
            5 => RCode::Refused,
            x => RCode::Unknown(x),
        }
    }
}

impl fmt::Display for RCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        match self {
            RCode::NoError => write!(f, "0 (NOERROR)"),
            RCode::FormatError => write!(f, "1 (FORMERR)"),
            RCode::ServerFailure => write!(f, "2 (SERVFAIL)"),
            RCode::NameError => write!(f, "3 (NXDOMAIN)"),
            RCode::NotImplemented => write!(f, "4 (NOTIMP)"),
            RCode::Refused => write!(f, "5 (REFUSED)"),
            RCode::Unknown(x) => write!(f, "{}", x),
        }
    }
}

impl Default for RCode {
    fn default() -> Self {
        RCode::NoError
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::setup;
    use crate::HeaderBuilder;

    fn encode(header: &Header) -> Vec<u8> {
        let mut buf = Vec::new();
        let len = header.to_bytes(&mut buf).unwrap();
        assert_eq!(len, HEADER_LEN);
        assert_eq!(buf.len(), HEADER_LEN);
        buf
    }

    #[test]
    fn test_known_vector() {
        setup();
        let header = HeaderBuilder::new().id(0xffff).qd_count(1).build();

        assert_eq!(
            encode(&header),
            b"\xff\xff\x00\x00\x00\x01\x00\x00\x00\x00\x00\x00".to_vec()
        );
    }

    #[test]
    fn test_flag_bit_positions() {
        setup();
        let header = HeaderBuilder::new()
            .id(0x1234)
            .qr(true)
            .opcode(OpCode::Status)
            .aa(true)
            .tc(false)
            .rd(true)
            .ra(true)
            .rcode(RCode::Refused)
            .qd_count(1)
            .an_count(2)
            .ns_count(3)
            .ar_count(0x0405)
            .build();

        assert_eq!(
            encode(&header),
            vec![0x12, 0x34, 0b1001_0101, 0b1000_0101, 0, 1, 0, 2, 0, 3, 4, 5]
        );
    }

    #[test]
    fn test_from_bytes_response() {
        setup();
        // Flags 0x8180: standard query response, RD and RA set.
        let input: &[u8] = &[0xdb, 0x42, 0x81, 0x80, 0, 1, 0, 1, 0, 0, 0, 0];
        let header = Header::from_bytes(input).unwrap();

        assert_eq!(header.id, 56130);
        assert!(header.qr);
        assert_eq!(header.opcode, OpCode::Query);
        assert!(!header.aa);
        assert!(!header.tc);
        assert!(header.rd);
        assert!(header.ra);
        assert_eq!(header.z, 0);
        assert_eq!(header.rcode, RCode::NoError);
        assert_eq!(header.qd_count, 1);
        assert_eq!(header.an_count, 1);
        assert_eq!(header.ns_count, 0);
        assert_eq!(header.ar_count, 0);
    }

    #[test]
    fn test_round_trip() {
        setup();
        for opcode in 0..=15u8 {
            for rcode in 0..=15u8 {
                for flags in 0..32u8 {
                    let header = Header {
                        id: u16::from(opcode) << 8 | u16::from(rcode),
                        qr: flags & 1 != 0,
                        opcode: OpCode::from(opcode),
                        aa: flags & 2 != 0,
                        tc: flags & 4 != 0,
                        rd: flags & 8 != 0,
                        ra: flags & 16 != 0,
                        z: 0,
                        rcode: RCode::from(rcode),
                        qd_count: 1,
                        an_count: u16::MAX,
                        ns_count: 0x8000,
                        ar_count: u16::from(flags),
                    };
                    let decoded = Header::from_bytes(&encode(&header)).unwrap();
                    assert_eq!(decoded, header);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_unknown_aliases() {
        setup();
        for opcode in [0u8, 1, 2, 4, 5].iter() {
            for rcode in 0..=5u8 {
                let header = HeaderBuilder::new()
                    .id(0x0a0b)
                    .opcode(OpCode::Unknown(*opcode))
                    .rcode(RCode::Unknown(rcode))
                    .build();
                let decoded = Header::from_bytes(&encode(&header)).unwrap();
                assert_eq!(decoded, header);
                assert_eq!(decoded.opcode, OpCode::from(*opcode));
                assert_eq!(decoded.rcode, RCode::from(rcode));
            }
        }

        assert_eq!(OpCode::Unknown(0), OpCode::Query);
        assert_eq!(RCode::Unknown(3), RCode::NameError);
        assert_ne!(OpCode::Unknown(3), OpCode::Query);
        assert_ne!(RCode::Unknown(6), RCode::Refused);
    }

    #[test]
    fn test_decoded_z_kept_but_not_encoded() {
        setup();
        // Reply with the AD bit set in the reserved field.
        let input: &[u8] = &[0, 9, 0x81, 0xa0, 0, 1, 0, 0, 0, 0, 0, 0];
        let header = Header::from_bytes(input).unwrap();
        assert_eq!(header.z, 0b010);
        assert!(header.ra);

        let mut buf = Vec::new();
        assert_eq!(
            header.to_bytes(&mut buf),
            Err(MessageError::InvalidField {
                field: "z",
                value: 2,
                max: 0
            })
        );
        assert!(buf.is_empty());

        let cleared = Header { z: 0, ..header };
        assert_eq!(&encode(&cleared)[2..4], &[0x81, 0x80]);
    }

    #[test]
    fn test_single_field_isolation() {
        setup();
        let base = HeaderBuilder::new()
            .id(0xabcd)
            .opcode(OpCode::IQuery)
            .rd(true)
            .rcode(RCode::NameError)
            .qd_count(1)
            .build();

        let variants: Vec<Header> = vec![
            Header { qr: true, ..base.clone() },
            Header { aa: true, ..base.clone() },
            Header { tc: true, ..base.clone() },
            Header { rd: false, ..base.clone() },
            Header { ra: true, ..base.clone() },
            Header { opcode: OpCode::Unknown(15), ..base.clone() },
            Header { rcode: RCode::Unknown(15), ..base.clone() },
        ];

        let base_bytes = encode(&base);
        for variant in variants {
            let bytes = encode(&variant);
            let changed: Vec<usize> = (0..HEADER_LEN)
                .filter(|i| bytes[*i] != base_bytes[*i])
                .collect();
            assert_eq!(changed.len(), 1, "{:?}", variant);

            let decoded = Header::from_bytes(&bytes).unwrap();
            assert_eq!(decoded, variant);
            assert_eq!(decoded.id, base.id);
            assert_eq!(decoded.qd_count, base.qd_count);
        }
    }

    #[test]
    fn test_tc_flip_leaves_neighbours() {
        setup();
        let header = HeaderBuilder::new().rd(true).aa(true).build();
        let mut bytes = encode(&header);
        bytes[2] ^= 0b0000_0010;

        let decoded = Header::from_bytes(&bytes).unwrap();
        assert!(decoded.tc);
        assert!(decoded.rd);
        assert!(decoded.aa);
        assert!(!decoded.qr);
        assert_eq!(decoded.opcode, OpCode::Query);
    }

    #[test]
    fn test_truncated_input() {
        setup();
        for len in 0..HEADER_LEN {
            let input = vec![0u8; len];
            assert_eq!(
                Header::from_bytes(&input),
                Err(MessageError::TruncatedMessage {
                    needed: HEADER_LEN,
                    available: len
                })
            );
        }
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        setup();
        let mut input = vec![0x00, 0x07, 0x80, 0x03, 0, 1, 0, 0, 0, 0, 0, 0];
        let exact = Header::from_bytes(&input).unwrap();
        input.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let padded = Header::from_bytes(&input).unwrap();

        assert_eq!(exact, padded);
        assert_eq!(exact.id, 7);
        assert!(exact.qr);
        assert_eq!(exact.rcode, RCode::NameError);
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        setup();
        let mut buf = Vec::new();

        let header = HeaderBuilder::new().opcode(OpCode::Unknown(16)).build();
        assert_eq!(
            header.to_bytes(&mut buf),
            Err(MessageError::InvalidField {
                field: "opcode",
                value: 16,
                max: 15
            })
        );

        let header = HeaderBuilder::new().rcode(RCode::Unknown(0xff)).build();
        assert_eq!(
            header.to_bytes(&mut buf),
            Err(MessageError::InvalidField {
                field: "rcode",
                value: 255,
                max: 15
            })
        );

        let header = Header {
            z: 1,
            ..Default::default()
        };
        assert_eq!(
            header.to_bytes(&mut buf),
            Err(MessageError::InvalidField {
                field: "z",
                value: 1,
                max: 0
            })
        );

        // Nothing is written on failure.
        assert!(buf.is_empty());
    }

    #[test]
    fn test_display() {
        let header = HeaderBuilder::new().id(1).qr(true).rcode(RCode::NameError).build();
        let shown = header.to_string();

        assert!(shown.starts_with("HEADER\n\tid 1\n\tqr 1\n"));
        assert!(shown.contains("\trcode 3 (NXDOMAIN)\n"));
        assert!(shown.ends_with("\tarcount 0"));
    }
}

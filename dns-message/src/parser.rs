use crate::error::MessageError;
use crate::{Header, OpCode, RCode, Result, HEADER_LEN};
use nom::bits::complete::take as take_bits;
use nom::bytes::complete::take as take_bytes;
use nom::combinator::map_res;
use nom::number::complete::be_u16;
use nom::IResult;
use tracing::{instrument, trace};

type BitInput<'a> = (&'a [u8], usize);

fn read_u16(input: &[u8]) -> IResult<&[u8], u16> {
    be_u16(input)
}

/// The two flag octets of the header, in wire order.
struct Flags {
    qr: bool,
    opcode: OpCode,
    aa: bool,
    tc: bool,
    rd: bool,
    ra: bool,
    z: u8,
    rcode: RCode,
}

fn read_flags(i: BitInput) -> IResult<BitInput, Flags> {
    let (i, qr): (_, u8) = take_bits(1usize)(i)?;
    let (i, opcode): (_, u8) = take_bits(4usize)(i)?;
    let (i, aa): (_, u8) = take_bits(1usize)(i)?;
    let (i, tc): (_, u8) = take_bits(1usize)(i)?;
    let (i, rd): (_, u8) = take_bits(1usize)(i)?;
    let (i, ra): (_, u8) = take_bits(1usize)(i)?;
    let (i, z): (_, u8) = take_bits(3usize)(i)?;
    let (i, rcode): (_, u8) = take_bits(4usize)(i)?;

    Ok((
        i,
        Flags {
            qr: qr == 1,
            opcode: OpCode::from(opcode),
            aa: aa == 1,
            tc: tc == 1,
            rd: rd == 1,
            ra: ra == 1,
            z,
            rcode: RCode::from(rcode),
        },
    ))
}

#[instrument(skip(input))]
pub(crate) fn read_header(input: &[u8]) -> IResult<&[u8], Header> {
    use nom::bits::bits;

    map_res(take_bytes(HEADER_LEN), |input| -> Result<Header> {
        trace!("reading header");
        let (input, id) = read_u16(input)?;

        trace!("reading flags");
        let (input, flags) =
            bits::<_, _, nom::error::Error<BitInput>, nom::error::Error<&[u8]>, _>(read_flags)(
                input,
            )?;

        let (input, qd_count) = read_u16(input)?;
        let (input, an_count) = read_u16(input)?;
        let (input, ns_count) = read_u16(input)?;
        let (_, ar_count) = read_u16(input)?;

        Ok(Header {
            id,
            qr: flags.qr,
            opcode: flags.opcode,
            aa: flags.aa,
            tc: flags.tc,
            rd: flags.rd,
            ra: flags.ra,
            z: flags.z,
            rcode: flags.rcode,
            qd_count,
            an_count,
            ns_count,
            ar_count,
        })
    })(input)
}

/// Reads the uncompressed name starting at `offset`, returning its labels
/// and the number of octets consumed (terminator included).
#[instrument(skip(input))]
pub(crate) fn read_name(input: &[u8], offset: usize) -> Result<(Vec<String>, usize)> {
    trace!("reading name");

    let truncated = |needed: usize| MessageError::TruncatedMessage {
        needed,
        available: input.len(),
    };

    let mut rest = input.get(offset..).ok_or_else(|| truncated(offset.saturating_add(1)))?;
    let mut pos = offset;
    let mut labels = Vec::new();

    loop {
        let (i, len) = nom::number::complete::be_u8::<_, nom::error::Error<&[u8]>>(rest)
            .map_err(|_| truncated(pos.saturating_add(1)))?;

        // The top two bits mark a compression pointer (0b11) or one of the
        // extended label types; neither is followed here.
        if len & 0b1100_0000 != 0 {
            return Err(MessageError::UnsupportedCompression {
                offset: pos,
                octet: len,
            });
        }
        pos += 1;

        // Names are terminated with a NULL byte.
        if len == 0 {
            break;
        }

        let (i, label) = take_bytes::<_, _, nom::error::Error<&[u8]>>(len)(i)
            .map_err(|_| truncated(pos.saturating_add(usize::from(len))))?;
        labels.push(std::str::from_utf8(label)?.to_string());
        trace!("Label of length {} found", len);

        pos += usize::from(len);
        rest = i;
    }

    Ok((labels, pos - offset))
}

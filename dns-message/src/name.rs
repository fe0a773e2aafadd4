use crate::{parser, MessageError, Result};
use bytes::BufMut;
use tracing::{instrument, trace};

/// RFC1035 - labels are restricted to 63 octets or less.
pub const MAX_LABEL_LEN: usize = 63;

/// RFC1035 - names are restricted to 255 octets or less, counting the
/// length octets and the terminating zero.
pub const MAX_NAME_LEN: usize = 255;

/// Splits dotted text such as `en.lichess.org` into its labels.
///
/// A single trailing dot is accepted and `.` (or the empty string) is the
/// root name. Empty labels inside the name are kept so that
/// [`encode_name`] can reject them.
pub fn split_name(name: &str) -> Vec<&str> {
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() {
        return Vec::new();
    }
    name.split('.').collect()
}

/// Writes `labels` as a sequence of length prefixed labels followed by the
/// zero length root label, returning the number of octets written.
///
/// No octets are written to `buf` unless the whole name is valid.
#[instrument(skip(labels, buf))]
pub fn encode_name<S: AsRef<str>>(labels: &[S], buf: &mut Vec<u8>) -> Result<usize> {
    let mut byte_count = 1;
    for label in labels.iter().map(AsRef::as_ref) {
        if label.is_empty() {
            return Err(MessageError::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(MessageError::LabelTooLong(label.len(), label.to_string()));
        }
        byte_count += 1 + label.len();
    }
    if byte_count > MAX_NAME_LEN {
        return Err(MessageError::NameTooLong(byte_count));
    }

    buf.reserve(byte_count);
    for label in labels.iter().map(AsRef::as_ref) {
        buf.put_u8(label.len() as u8);
        buf.put_slice(label.as_bytes());
    }
    buf.put_u8(0);

    trace!("Wrote {} bytes", byte_count);

    Ok(byte_count)
}

/// Reads the name at `offset` in `input`, returning the labels and the
/// number of octets the encoded name occupies.
///
/// Compression pointers are not followed and fail with
/// [`MessageError::UnsupportedCompression`].
pub fn decode_name(input: &[u8], offset: usize) -> Result<(Vec<String>, usize)> {
    parser::read_name(input, offset)
}

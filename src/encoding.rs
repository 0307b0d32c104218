use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, PercentEncode};
use std::borrow::Cow;

use crate::error::{Error, Result};

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const TARGETS_FOR_PARAMS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode with the OAuth 1.0a unreserved set. Space becomes `%20`, never `+`.
pub fn percent_encode(input: &str) -> PercentEncode<'_> {
    utf8_percent_encode(input, TARGETS_FOR_PARAMS)
}

pub fn percent_encode_cow<'a, T: Into<Cow<'a, str>>>(input: T) -> Cow<'a, str> {
    match input.into() {
        Cow::Borrowed(r) => Cow::from(percent_encode(r)),
        Cow::Owned(v) => Cow::from(percent_encode(&v).to_string()),
    }
}

/// Inverse of [`percent_encode`]. `+` is left alone since the encoder never emits it.
pub fn percent_decode(input: &str) -> Result<Cow<'_, str>> {
    percent_decode_str(input)
        .decode_utf8()
        .map_err(|e| Error::InvalidParameter(format!("{:?} is not valid UTF-8: {}", input, e)))
}

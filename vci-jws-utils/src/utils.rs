// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bherror::traits::{ErrorContext as _, ForeignError as _};

use crate::DecodeError;

/// Type alias for a boxed error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Create the signing input for a `JWS`, given its encoded header and payload.
///
/// The signing input is constructed by concatenating the header and payload
/// by the `.` character, i.e. `<header>.<payload>`, as defined [here].
///
/// [here]: https://www.rfc-editor.org/rfc/rfc7515.html#section-5.1
pub fn jws_signing_input(header: &str, payload: &str) -> String {
    format!("{header}.{payload}")
}

/// Returns the `base64url`-encoded string of the given `input`, without
/// padding.
///
/// Text must be passed as its UTF-8 bytes (e.g. `&str` or `String`), so that
/// non-ASCII characters survive the round trip.
pub fn base64_url_encode<T: AsRef<[u8]>>(input: T) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decodes the given `base64url`-encoded `input` into bytes.
///
/// The canonical form carries no padding, but trailing `=` characters are
/// tolerated and stripped before decoding.
///
/// # Errors
///
/// Fails with [`DecodeError::InvalidBase64Url`] if the input contains
/// characters outside of the `base64url` alphabet or has a length that no
/// padding could make valid.
pub fn base64_url_decode<T: AsRef<[u8]>>(input: T) -> bherror::Result<Vec<u8>, DecodeError> {
    let input = input.as_ref();
    let unpadded = match input.iter().rposition(|&byte| byte != b'=') {
        Some(last) => &input[..=last],
        None => &input[..0],
    };

    URL_SAFE_NO_PAD
        .decode(unpadded)
        .foreign_err(|| DecodeError::InvalidBase64Url)
        .ctx(|| format!("input of length {}", input.len()))
}

/// Decodes the given `base64url`-encoded `input` and interprets the result as
/// UTF-8 text.
pub fn base64_url_decode_to_string<T: AsRef<[u8]>>(
    input: T,
) -> bherror::Result<String, DecodeError> {
    let bytes = base64_url_decode(input)?;

    String::from_utf8(bytes).foreign_err(|| DecodeError::InvalidUtf8)
}

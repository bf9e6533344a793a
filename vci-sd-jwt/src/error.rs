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

/// Segment of the issuer-signed JWT that failed to decode.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone, Copy)]
pub enum JwtSegment {
    /// The JOSE header.
    #[strum(to_string = "header")]
    Header,

    /// The claims payload.
    #[strum(to_string = "payload")]
    Payload,
}

/// Format error related to parsing SD-JWT credentials.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum FormatError {
    /// The input has no `~` separator, so it cannot be an SD-JWT.
    #[strum(to_string = "Malformed SD-JWT")]
    MalformedSdJwt,

    /// The issuer-signed part does not consist of exactly three `.`
    /// separated segments.
    #[strum(to_string = "Malformed JWT")]
    MalformedJwt,

    /// A JWT segment is not `base64url` encoded JSON of the expected shape.
    #[strum(to_string = "Invalid encoding of JWT {0}")]
    InvalidEncoding(JwtSegment),

    /// A single disclosure could not be decoded.
    ///
    /// The decoder never surfaces this error; it records the disclosure as
    /// [`DisclosureEntry::Invalid`](crate::DisclosureEntry::Invalid) instead.
    #[strum(to_string = "Invalid disclosure: {0}")]
    InvalidDisclosure(String),
}

impl bherror::BhError for FormatError {}

/// Result type used across the crate.
pub type Result<T, E> = bherror::Result<T, E>;

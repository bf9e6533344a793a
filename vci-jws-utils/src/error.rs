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

/// Error in `base64url` decoding.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum DecodeError {
    /// The input contains characters outside of the `base64url` alphabet, or
    /// its length cannot be padded to a valid encoding.
    #[strum(to_string = "Invalid base64url input")]
    InvalidBase64Url,

    /// The decoded bytes are not valid UTF-8 text.
    #[strum(to_string = "Decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

impl bherror::BhError for DecodeError {}

/// Error in JWK format
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum FormatError {
    /// Error that occurs when JWK parsing failed
    #[strum(to_string = "JWK parsing failed: {0}")]
    JwkParsingFailed(String),
}

impl bherror::BhError for FormatError {}

/// Error raised by a [`Signer`](crate::Signer) implementation.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum SigningError {
    /// The signer does not hold a key with the requested `kid`.
    #[strum(to_string = "Unknown signing key {0}")]
    UnknownKeyId(String),

    /// Error that occurs when the signing algorithm is invalid
    #[strum(to_string = "Invalid signing algorithm {0}")]
    InvalidSigningAlgorithm(String),
}

impl bherror::BhError for SigningError {}

/// Cryptographic error
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum CryptoError {
    /// Error that occurs when key generation failed
    #[strum(to_string = "Key generation failed")]
    KeyGenerationFailed,
    /// Error that occurs when the cryptographic backend
    /// unexpectedly failed
    #[strum(to_string = "Crypto backend failed")]
    CryptoBackend,
}

impl bherror::BhError for CryptoError {}

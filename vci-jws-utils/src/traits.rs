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

use std::str::FromStr;

use bherror::Error;
use serde::{Deserialize, Serialize};

use crate::{error::SigningError, utils::BoxError, JwkPublic};

/// Signature algorithms the issuer may advertise in the `alg` JWT header.
///
/// Only ECDSA variants are listed, since the credential format requires an
/// asymmetric algorithm and the demo deployment publishes EC keys. For the
/// registered names see [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SigningAlgorithm {
    /// ECDSA over P-256 with SHA-256
    Es256,
    /// ECDSA over P-384 with SHA-384
    Es384,
    /// ECDSA over P-521 with SHA-512
    Es512,
}

/// JWS `"alg"` header parameter value for digital signature algorithm
/// **ECDSA using P-256 and SHA-256**, as specified in [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
pub const SIGNING_ALG_ES256: &str = "ES256";
/// JWS `"alg"` header parameter value for digital signature algorithm
/// **ECDSA using P-384 and SHA-384**, as specified in [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
pub const SIGNING_ALG_ES384: &str = "ES384";
/// JWS `"alg"` header parameter value for digital signature algorithm
/// **ECDSA using P-521 and SHA-512**, as specified in [RFC7518].
///
/// [RFC7518]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.1
pub const SIGNING_ALG_ES512: &str = "ES512";

impl FromStr for SigningAlgorithm {
    type Err = Error<SigningError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            SIGNING_ALG_ES256 => Ok(SigningAlgorithm::Es256),
            SIGNING_ALG_ES384 => Ok(SigningAlgorithm::Es384),
            SIGNING_ALG_ES512 => Ok(SigningAlgorithm::Es512),
            _ => Err(Error::root(SigningError::InvalidSigningAlgorithm(
                value.to_string(),
            ))),
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Es256 => SIGNING_ALG_ES256,
            Self::Es384 => SIGNING_ALG_ES384,
            Self::Es512 => SIGNING_ALG_ES512,
        };
        f.write_str(name)
    }
}

/// The signing hook of the credential issuer.
///
/// The issuer never signs anything itself; it hands the JWS signing input
/// (`<base64url(header)>.<base64url(payload)>`) to an implementation of this
/// trait together with the `kid` it put into the JWT header.
///
/// # Contract
///
/// - The returned value is the third segment of the compact JWS, i.e. the
///   signature already `base64url`-encoded without padding, as in step 5 of
///   [section 5.1 of RFC7515](https://www.rfc-editor.org/rfc/rfc7515.html#section-5.1).
/// - The signature must be produced with the private key identified by
///   `key_id`, using [`Signer::algorithm`]. If no such key is available, an
///   error must be returned rather than signing with another key.
/// - Errors are returned boxed and are propagated by the issuer untouched, as
///   the source of its own signing error.
pub trait Signer: Send + Sync {
    /// The algorithm this signer uses. Must be a constant function.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Sign the `signing_input` with the key identified by `key_id`.
    fn sign(&self, signing_input: &str, key_id: &str) -> Result<String, BoxError>;
}

impl<S: Signer + ?Sized> Signer for &S {
    fn algorithm(&self) -> SigningAlgorithm {
        (**self).algorithm()
    }

    fn sign(&self, signing_input: &str, key_id: &str) -> Result<String, BoxError> {
        (**self).sign(signing_input, key_id)
    }
}

/// An external backend for signature verification, to be used for verifying
/// JWS signatures.
pub trait SignatureVerifier: Send + Sync {
    /// The algorithm used for the signature verification.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Verifies the signature of the message, against the provided public key.
    ///
    /// The `signature` is the raw signature, i.e. the third JWS segment after
    /// `base64url` decoding.
    ///
    /// # Return
    /// Method returns `Ok(true)` if the signature if valid for the given
    /// message, `Ok(false)` if it isn't (but there was no issue with the
    /// verifier itself), and `Err(_)` when the verifier itself encounters an
    /// error for any other reason.
    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &JwkPublic,
    ) -> Result<bool, BoxError>;
}

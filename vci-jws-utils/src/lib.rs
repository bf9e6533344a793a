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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides the low-level building blocks the credential issuer
//! needs for producing and checking [JSON Web Signatures (JWS)][1].
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7515
//!
//! # Details
//!
//! * [`base64_url_encode`] and [`base64_url_decode`] implement the padding-free
//!   `base64url` alphabet used for every JWT segment and every SD-JWT disclosure.
//! * [`Signer`] is the signing hook. Implementations receive the JWS signing
//!   input together with the `kid` of the key the caller wants to sign with,
//!   and return the encoded signature segment.
//! * [`SignatureVerifier`] verifies a signature against a public JWK.
//! * [`JwkSet`] models the set of public keys an issuer publishes.
//!
//! A default [`openssl`] backed `ES256` implementation is available via
//! [`Es256Signer`] and [`Es256Verifier`] under the default `openssl` feature.
//!
//! # Examples
//!
//! ```
//! use vci_jws_utils::{base64_url_decode, jws_signing_input, Es256Signer, Es256Verifier};
//! use vci_jws_utils::{SignatureVerifier, Signer};
//!
//! let signer = Es256Signer::generate("issuer-key-1".to_string()).unwrap();
//! let public_jwk = signer.public_jwk().unwrap();
//!
//! let signing_input = jws_signing_input("eyJhbGciOiJFUzI1NiJ9", "eyJzdWIiOiJTMTIzIn0");
//! let signature = signer.sign(&signing_input, "issuer-key-1").unwrap();
//!
//! let valid = Es256Verifier
//!     .verify(
//!         signing_input.as_bytes(),
//!         &base64_url_decode(&signature).unwrap(),
//!         &public_jwk,
//!     )
//!     .unwrap();
//! assert!(valid);
//! ```

#[cfg(feature = "openssl")]
mod openssl_impl;

mod error;
mod jwk;
mod traits;
mod utils;

pub use error::*;
pub use jwk::*;
#[cfg(feature = "openssl")]
pub use openssl_impl::*;
pub use traits::*;
pub use utils::*;

/// Helper macro with the same syntax as [`serde_json::json`] specialized for
/// constructing JSON objects.
///
/// It will construct a more specific type ([`serde_json::Map<String,Value>`])
/// than just [`serde_json::Value`] when constructing an object, and panic if
/// the syntax is valid JSON but not an object.
#[macro_export]
macro_rules! json_object {
    ($stuff:tt) => {
        match ::serde_json::json!($stuff) {
            ::serde_json::Value::Object(o) => o,
            _ => unreachable!("JSON literal wasn't an object"),
        }
    };
}

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

//! This crate implements the credential engine of a demo [OpenID4VCI][1]
//! university issuer: construction, parsing, selective re-disclosure and
//! verification of [Selective Disclosure JWTs (SD-JWT)][2].
//!
//! [1]: <https://openid.net/specs/openid-4-verifiable-credential-issuance-1_0.html>
//! [2]: <https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt>
//!
//! # Details
//!
//! The main components of this crate are the following.
//!
//! * [`issuer`] -- Resolves template claims and assembles signed SD-JWT credentials.
//! * [`holder`] -- Imports credentials and produces presentations with a subset of disclosures.
//! * [`verifier`] -- Checks signatures, disclosure commitments and the validity window.
//! * [`lookup`] -- In-memory retrieval of the issuer's public keys.
//! * [`template`] -- Credential templates as synchronized from the credential manager.
//!
//! The free functions [`assemble_credential`], [`decode_credential`] and
//! [`redisclose_credential`] cover the common one-shot uses.
//!
//! # Examples
//!
//! See `examples/university-credential.rs` for the full issue, present and
//! verify flow.

// Re-export the `vci-jws-utils` crate
pub use vci_jws_utils;
pub use error::{FormatError, JwtSegment, Result};

mod claims;
mod decoder;
mod error;
mod models;
mod sd_jwt;
mod settings;
#[cfg(test)]
mod test_utils;
mod traits;
mod utils;

pub mod holder;
pub mod issuer;
pub mod lookup;
pub mod template;
pub mod verifier;

pub use claims::{aliases_of, CLAIM_ALIASES};
pub use decoder::{decode_credential, DecodedCredential};
pub use holder::redisclose_credential;
pub use iref;
pub use issuer::{assemble_credential, IssuerJwt, IssuerJwtHeader, VcClaim};
pub use models::*;
pub use settings::{IssuerSettings, SettingsError};
pub use traits::*;
pub use vci_jws_utils::json_object;

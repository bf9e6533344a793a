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

//! In-memory lookup of the issuer's public keys, keyed by the Issuer
//! Identifier (`iss`) and the `kid` of the JWT header.

use std::collections::HashMap;

use bherror::{BhError, Error};
pub use vci_jws_utils::{JwkPublic, JwkSet};

use crate::{IssuerJwtHeader, IssuerPublicKeyLookup};

/// Error type for the public key lookup.
#[derive(strum_macros::Display, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// No keys are known for the alleged issuer.
    #[strum(to_string = "Unknown issuer: {0}")]
    UnknownIssuer(String),
    /// The issuer has no key with the `kid` of the header.
    #[strum(to_string = "Unknown key: {0}")]
    UnknownKey(String),
}

impl BhError for LookupError {}

/// [`IssuerPublicKeyLookup`] over a fixed set of trusted issuers and their
/// [`JwkSet`]s.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyLookup {
    issuers: HashMap<String, JwkSet>,
}

impl InMemoryKeyLookup {
    /// Create a lookup that trusts no issuer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust the issuer `iss` with the keys of `jwk_set`, replacing any keys
    /// previously registered for it.
    pub fn with_issuer(mut self, iss: impl Into<String>, jwk_set: JwkSet) -> Self {
        self.issuers.insert(iss.into(), jwk_set);
        self
    }
}

impl IssuerPublicKeyLookup for InMemoryKeyLookup {
    type Err = LookupError;

    fn lookup(
        &self,
        alleged_iss: &str,
        header: &IssuerJwtHeader,
    ) -> Result<JwkPublic, Error<Self::Err>> {
        let Some(jwk_set) = self.issuers.get(alleged_iss) else {
            return Err(Error::root(LookupError::UnknownIssuer(
                alleged_iss.to_owned(),
            )));
        };

        jwk_set
            .find(Some(header.kid.as_str()))
            .cloned()
            .ok_or_else(|| Error::root(LookupError::UnknownKey(header.kid.clone())))
    }
}

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

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object meant to represent a public JWK.
///
/// Since this is a type alias, no aspects of the schema are enforced; this is
/// left to any end-consumers of the public key, such as
/// [`SignatureVerifier`](crate::SignatureVerifier).
pub type JwkPublic = Map<String, Value>;

/// Returns the `kid` parameter of the given JWK, if present and a string.
pub fn jwk_kid(jwk: &JwkPublic) -> Option<&str> {
    jwk.get("kid").and_then(Value::as_str)
}

/// Models JWK Set. A JSON object that represents a set of JWKs, as published
/// by an issuer for the verification of its credentials.
///
/// If any of the JWKs in the set has a `kid` parameter then all of them must
/// have one, and the values must be distinct. This is checked on
/// deserialization and by [`JwkSet::new`].
///
/// For more details see [RFC7517][RFC].
///
/// [RFC]: https://datatracker.ietf.org/doc/html/rfc7517#section-5
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "JwkSetUnverified")]
pub struct JwkSet {
    keys: Vec<JwkPublic>,
}

impl JwkSet {
    /// Create empty `JwkSet`.
    pub fn empty() -> Self {
        JwkSet { keys: vec![] }
    }

    /// Create a `JwkSet` from the given keys, validating the `kid` rules.
    pub fn new(keys: Vec<JwkPublic>) -> Result<Self, &'static str> {
        JwkSetUnverified { keys }.try_into()
    }

    /// All the keys in the set.
    pub fn keys(&self) -> &[JwkPublic] {
        &self.keys
    }

    /// Find the key to verify with.
    ///
    /// With a `kid`, the key carrying that `kid` is returned. Without one, a
    /// key is returned only if the set is unambiguous, i.e. it holds a single
    /// key.
    pub fn find(&self, kid: Option<&str>) -> Option<&JwkPublic> {
        match kid {
            Some(kid) => self.keys.iter().find(|jwk| jwk_kid(jwk) == Some(kid)),
            None => match self.keys.as_slice() {
                [only] => Some(only),
                _ => None,
            },
        }
    }
}

/// "Shadow" type used to validate a deserialized [`JwkSet`] through
/// `#[serde(try_from)]`.
#[derive(Deserialize, Debug)]
struct JwkSetUnverified {
    keys: Vec<JwkPublic>,
}

impl TryFrom<JwkSetUnverified> for JwkSet {
    type Error = &'static str;

    fn try_from(value: JwkSetUnverified) -> std::result::Result<Self, Self::Error> {
        let keys = value.keys;
        let jwk_with_kid_cnt = keys.iter().filter(|jwk| jwk.contains_key("kid")).count();

        if jwk_with_kid_cnt == 0 {
            return Ok(JwkSet { keys });
        }
        if jwk_with_kid_cnt != keys.len() {
            return Err("Some of the provided JWKs contain kid parameter values and some don't");
        }

        let mut uniq = HashSet::new();
        for key in keys.iter() {
            let kid = jwk_kid(key).ok_or("JWK contains a `kid` parameter that is not a string")?;
            if !uniq.insert(kid) {
                return Err("Provided JWKs contain duplicate kid parameter values");
            }
        }

        Ok(JwkSet { keys })
    }
}

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

use core::fmt;

use bherror::{
    traits::{ErrorContext, ForeignError, PropagateError},
    Error,
};
use serde_json::Value;

use crate::{error::FormatError, utils, Hasher};

/// Placeholder shown in place of a disclosure that could not be decoded.
pub const INVALID_DISCLOSURE_MARKER: [&str; 2] = ["<decode-error>", "<invalid>"];

/// A disclosure of a single credential claim, in both parsed form and the
/// original serialized form.
///
/// The serialized form is kept verbatim so that digests computed over a
/// received disclosure always match the ones the issuer committed to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Disclosure {
    salt: Salt,
    claim_name: String,
    value: Value,
    // serialized-as-hashed
    serialized: String,
}

impl TryFrom<String> for Disclosure {
    type Error = Error<FormatError>;

    fn try_from(serialized: String) -> Result<Self, Self::Error> {
        let decoded = vci_jws_utils::base64_url_decode(&serialized)
            .with_err(|| {
                FormatError::InvalidDisclosure("provided string is not base64".to_string())
            })
            .ctx(|| serialized.clone())?;

        let parsed: Value = serde_json::from_slice(&decoded)
            .foreign_err(|| {
                FormatError::InvalidDisclosure(
                    "serde json could not parse decoded base64 string".to_string(),
                )
            })
            .ctx(|| serialized.clone())?;

        let Value::Array(mut array) = parsed else {
            return Err(Error::root(FormatError::InvalidDisclosure(
                "deserialized disclosure is not an array".to_string(),
            )))
            .ctx(|| serialized.clone());
        };

        if array.len() < 3 {
            return Err(Error::root(FormatError::InvalidDisclosure(format!(
                "deserialized disclosure array has invalid length {}",
                array.len(),
            ))))
            .ctx(|| serialized.clone());
        }

        // trailing elements past the value carry no meaning and are ignored
        array.truncate(3);
        let value = array.pop().unwrap_or(Value::Null);
        let claim_name = match array.pop() {
            Some(Value::String(claim_name)) => claim_name,
            _ => {
                return Err(Error::root(FormatError::InvalidDisclosure(
                    "claim name is not a string".to_string(),
                )))
                .ctx(|| serialized.clone())
            }
        };
        let salt = match array.pop() {
            Some(Value::String(salt)) => salt,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        Ok(Self {
            salt,
            claim_name,
            value,
            serialized,
        })
    }
}

impl fmt::Display for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.salt, self.claim_name, self.value)
    }
}

impl Disclosure {
    /// Construct a new [`Disclosure`] from the given `salt`, `claim_name` and
    /// `claim_value`.
    ///
    /// The serialized form is the `base64url` encoding of the compact JSON
    /// array `[salt, claim_name, claim_value]`.
    pub fn new(salt: Salt, claim_name: String, claim_value: Value) -> Self {
        let canonical = Value::Array(vec![
            Value::String(salt.clone()),
            Value::String(claim_name.clone()),
            claim_value.clone(),
        ]);

        let serialized = vci_jws_utils::base64_url_encode(canonical.to_string());

        Self {
            salt,
            claim_name,
            value: claim_value,
            serialized,
        }
    }

    /// Disclosure hash salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Name of the disclosed claim.
    pub fn claim_name(&self) -> &str {
        &self.claim_name
    }

    /// Value of the disclosed claim.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Serialized form of [`Self`]
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Serialize [`Self`] into an owned [`String`].
    pub fn into_string(self) -> String {
        self.serialized
    }

    /// The `base64url` encoded digest of the serialized form, as it appears in
    /// the `_sd` array of the credential.
    pub fn digest(&self, hasher: impl Hasher) -> Digest {
        utils::base64_url_digest(self.serialized.as_bytes(), hasher)
    }
}

/// Base64url encoded disclosure hash salt.
pub type Salt = String;

/// Base64url encoded hash value.
pub type Digest = String;

/// A single disclosure of a decoded credential, classified by how it relates
/// to the issuer-signed payload.
#[derive(Debug, PartialEq, Clone)]
pub enum DisclosureEntry {
    /// The disclosure decoded and its digest is listed in `_sd`.
    Disclosed(Disclosure),

    /// The disclosure decoded, but the issuer never committed to it. Its
    /// claim is not merged into the reconstructed claims.
    Unreferenced(Disclosure),

    /// The disclosure could not be decoded.
    Invalid {
        /// The segment exactly as it appeared in the credential.
        serialized: String,
    },
}

impl DisclosureEntry {
    /// The decoded disclosure, unless the entry is invalid.
    pub fn disclosure(&self) -> Option<&Disclosure> {
        match self {
            Self::Disclosed(disclosure) | Self::Unreferenced(disclosure) => Some(disclosure),
            Self::Invalid { .. } => None,
        }
    }

    /// Claim name of the decoded disclosure, unless the entry is invalid.
    pub fn claim_name(&self) -> Option<&str> {
        self.disclosure().map(Disclosure::claim_name)
    }

    /// The disclosure segment in the form it was received.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Disclosed(disclosure) | Self::Unreferenced(disclosure) => disclosure.as_str(),
            Self::Invalid { serialized } => serialized,
        }
    }

    /// Returns `true` if the entry could not be decoded.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// JSON array view of the entry for display purposes: the decoded
    /// `[salt, claim_name, claim_value]` triple, or
    /// [`INVALID_DISCLOSURE_MARKER`] for an entry that did not decode.
    pub fn to_array(&self) -> Value {
        match self.disclosure() {
            Some(disclosure) => Value::Array(vec![
                Value::String(disclosure.salt.clone()),
                Value::String(disclosure.claim_name.clone()),
                disclosure.value.clone(),
            ]),
            None => Value::Array(
                INVALID_DISCLOSURE_MARKER
                    .iter()
                    .map(|s| Value::String((*s).to_owned()))
                    .collect(),
            ),
        }
    }
}

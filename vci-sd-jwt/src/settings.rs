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

use bherror::traits::{ErrorContext as _, ForeignError as _};
use serde::{Deserialize, Serialize};
use vci_jws_utils::JwkPublic;

use crate::HashingAlgorithm;

const DEFAULT_SUBJECT_DID_PREFIX: &str = "did:example:";

/// Error type related to loading the issuer settings.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum SettingsError {
    /// The settings document could not be parsed.
    #[strum(to_string = "Invalid issuer settings")]
    InvalidSettings,
}

impl bherror::BhError for SettingsError {}

/// Issuer-wide configuration of credential assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerSettings {
    /// Identifier of the signing key, placed in the `kid` header parameter
    /// and passed to the signer.
    pub kid: String,

    /// Public key placed in the `cnf` claim of every issued credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_binding_jwk: Option<JwkPublic>,

    /// Prefix of the `credentialSubject.id` value; the subject identifier is
    /// appended to it.
    #[serde(default = "default_subject_did_prefix")]
    pub subject_did_prefix: String,

    /// Algorithm used for disclosure digests.
    #[serde(default)]
    pub hashing_algorithm: HashingAlgorithm,
}

fn default_subject_did_prefix() -> String {
    DEFAULT_SUBJECT_DID_PREFIX.to_owned()
}

impl IssuerSettings {
    /// Settings for signing with key `kid`, with every other field at its
    /// default.
    pub fn new(kid: String) -> Self {
        Self {
            kid,
            holder_binding_jwk: None,
            subject_did_prefix: default_subject_did_prefix(),
            hashing_algorithm: HashingAlgorithm::default(),
        }
    }

    /// Set the public key placed in the `cnf` claim.
    pub fn with_holder_binding_jwk(mut self, jwk: JwkPublic) -> Self {
        self.holder_binding_jwk = Some(jwk);
        self
    }

    /// Load the settings from a JSON document.
    pub fn from_json(json: &str) -> bherror::Result<Self, SettingsError> {
        serde_json::from_str(json)
            .foreign_err(|| SettingsError::InvalidSettings)
            .ctx(|| "parsing issuer settings")
    }

    /// The `credentialSubject.id` value for `subject_id`.
    pub fn subject_did(&self, subject_id: &str) -> String {
        format!("{}{}", self.subject_did_prefix, subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_object;

    #[test]
    fn settings_defaults() {
        let settings = IssuerSettings::from_json(r#"{"kid": "university-issuer-1"}"#).unwrap();

        assert_eq!(settings, IssuerSettings::new("university-issuer-1".to_owned()));
        assert_eq!(settings.subject_did("S12345678"), "did:example:S12345678");
        assert_eq!(settings.hashing_algorithm, HashingAlgorithm::Sha256);
    }

    #[test]
    fn settings_full_document() {
        let settings = IssuerSettings::from_json(
            r#"{
                "kid": "university-issuer-1",
                "holderBindingJwk": {"kty": "EC", "crv": "P-256", "x": "AA", "y": "AA"},
                "subjectDidPrefix": "did:web:university.example.edu:students:",
                "hashingAlgorithm": "sha-256"
            }"#,
        )
        .unwrap();

        assert_eq!(
            settings.holder_binding_jwk,
            Some(json_object!({"kty": "EC", "crv": "P-256", "x": "AA", "y": "AA"}))
        );
        assert_eq!(
            settings.subject_did("S1"),
            "did:web:university.example.edu:students:S1"
        );
    }

    #[test]
    fn settings_reject_unknown_hashing_algorithm() {
        let error =
            IssuerSettings::from_json(r#"{"kid": "k", "hashingAlgorithm": "md5"}"#).unwrap_err();

        assert_eq!(error.error, SettingsError::InvalidSettings);
    }

    #[test]
    fn settings_require_kid() {
        let error = IssuerSettings::from_json("{}").unwrap_err();

        assert_eq!(error.error, SettingsError::InvalidSettings);
    }
}

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

//! Credential templates, as synchronized from the Verifiable Credential
//! Manager, and their resolution by identifier.

use std::collections::HashMap;

use bherror::{
    traits::{ErrorContext as _, ForeignError as _},
    Error,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{iref::UriBuf, SecondsSinceEpoch, TemplateResolver};

/// Number of seconds in one day of credential validity.
pub const SECONDS_PER_DAY: SecondsSinceEpoch = 86_400;

/// Error type related to template loading and resolution.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum TemplateError {
    /// No template is registered under the requested identifier.
    #[strum(to_string = "Template not found: {0}")]
    TemplateNotFound(String),

    /// The template document could not be parsed.
    #[strum(to_string = "Invalid template")]
    InvalidTemplate,
}

impl bherror::BhError for TemplateError {}

/// Result type used by the [`template`][crate::template] module.
pub type Result<T> = bherror::Result<T, TemplateError>;

/// A credential type the issuer can issue: its claims with their
/// selective-disclosure policy, validity and display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTemplate {
    /// Template identifier, e.g. `UniversityStudentCredential`.
    pub id: String,

    /// Issuer identifier placed in the `iss` claim.
    pub issuer: UriBuf,

    /// Validity of an issued credential, counted from its issuance.
    pub validity_period_days: u32,

    /// JSON-LD contexts placed in `vc["@context"]`.
    #[serde(default, alias = "@context")]
    pub context: Vec<String>,

    /// Credential types placed in `vc.type`.
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Claim definitions, in the order their disclosures are produced.
    pub claims: Vec<ClaimDefinition>,

    /// Localized display metadata of the credential.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display: Vec<DisplayMetadata>,
}

/// Definition of a single claim of a [`CredentialTemplate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDefinition {
    /// Claim key, as it appears in the credential.
    pub key: String,

    /// Issuance fails if no value resolves for a required claim.
    #[serde(default)]
    pub required: bool,

    /// Selectively disclosable claims are carried as disclosures, all others
    /// are embedded in `credentialSubject`.
    #[serde(default)]
    pub selective_disclosure: bool,

    /// Value used when neither the subject's claims nor an override
    /// provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Localized labels of the claim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display: Vec<ClaimDisplay>,
}

/// Localized label of a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDisplay {
    /// Label text.
    pub name: String,

    /// Language tag, e.g. `ja-JP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Localized display metadata of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMetadata {
    /// Display name of the credential.
    pub name: String,

    /// Longer description of the credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Language tag, e.g. `en-US`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Card background color, as a CSS color value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    /// Card text color, as a CSS color value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    /// Card logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,
}

/// Logo image of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    /// Location of the image.
    pub uri: String,

    /// Alternative text of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl CredentialTemplate {
    /// Returns the definition of the claim with the given `key`.
    pub fn claim(&self, key: &str) -> Option<&ClaimDefinition> {
        self.claims.iter().find(|claim| claim.key == key)
    }

    /// Validity of an issued credential in seconds.
    pub fn validity_period_seconds(&self) -> SecondsSinceEpoch {
        SecondsSinceEpoch::from(self.validity_period_days) * SECONDS_PER_DAY
    }
}

/// [`TemplateResolver`] over a fixed set of templates held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateResolver {
    templates: HashMap<String, CredentialTemplate>,
}

impl InMemoryTemplateResolver {
    /// Construct a resolver over the given templates. A later template
    /// replaces an earlier one with the same `id`.
    pub fn new(templates: impl IntoIterator<Item = CredentialTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.id.clone(), template))
                .collect(),
        }
    }

    /// Load the templates from a JSON array of template documents.
    pub fn from_json(json: &str) -> Result<Self> {
        let templates: Vec<CredentialTemplate> = serde_json::from_str(json)
            .foreign_err(|| TemplateError::InvalidTemplate)
            .ctx(|| "parsing the template list")?;

        Ok(Self::new(templates))
    }

    /// Identifiers of all the held templates, in no particular order.
    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl TemplateResolver for InMemoryTemplateResolver {
    fn resolve(&self, template_id: &str) -> Result<CredentialTemplate> {
        self.templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| Error::root(TemplateError::TemplateNotFound(template_id.to_owned())))
    }
}

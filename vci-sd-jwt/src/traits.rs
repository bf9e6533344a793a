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

use std::collections::HashMap;

use bherror::{BhError, Error};
use serde_json::Value;
use vci_jws_utils::JwkPublic;

use crate::{
    issuer::IssuerJwtHeader,
    template::{CredentialTemplate, TemplateError},
    JsonObject,
};

mod hasher;
pub use hasher::{Hasher, HashingAlgorithm};
mod r#impl;
pub use r#impl::Sha256;

/// Look up the issuer's public key for the purpose of signature verification
/// based on the alleged `iss` identifier and the JWT header (both obviously not
/// yet verified).
///
/// If it is not possible to retrieve the public key for any reason, an error
/// with an appropriate message is returned.
///
/// # Security
///
/// The implementation MUST only look up public keys from trusted sources;
/// otherwise there is no guarantee of integrity of would-be-issuer-signed
/// data.
pub trait IssuerPublicKeyLookup: Send + Sync {
    /// [`BhError`] type used in this trait.
    type Err: BhError;

    /// Lookup a public key for the alleged Issuer Identifier.
    fn lookup(
        &self,
        alleged_iss: &str,
        header: &IssuerJwtHeader,
    ) -> Result<JwkPublic, Error<Self::Err>>;
}

/// Resolves credential templates by their identifier.
///
/// Template storage and synchronization with the credential manager live
/// outside of this crate; see
/// [`InMemoryTemplateResolver`](crate::template::InMemoryTemplateResolver)
/// for the in-memory implementation.
pub trait TemplateResolver: Send + Sync {
    /// Return the template with the given `template_id`, or
    /// [`TemplateError::TemplateNotFound`].
    fn resolve(&self, template_id: &str) -> crate::Result<CredentialTemplate, TemplateError>;
}

/// Source of claim values about a subject, e.g. the attributes released by
/// the user's authentication session.
pub trait ClaimSource: Send + Sync {
    /// Return the value of `claim_key` for `subject_id`, if the source has one.
    fn resolve(&self, subject_id: &str, claim_key: &str) -> Option<Value>;
}

/// Claims keyed by subject identifier.
impl ClaimSource for HashMap<String, JsonObject> {
    fn resolve(&self, subject_id: &str, claim_key: &str) -> Option<Value> {
        self.get(subject_id)?.get(claim_key).cloned()
    }
}

impl<S: ClaimSource> ClaimSource for &S {
    fn resolve(&self, subject_id: &str, claim_key: &str) -> Option<Value> {
        (*self).resolve(subject_id, claim_key)
    }
}

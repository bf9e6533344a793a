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

use serde::{Deserialize, Serialize};
pub use serde_json::{Map, Value};
use vci_jws_utils::JwkPublic;

mod disclosure;

pub use disclosure::*;

/// The `cnf` claim of the credential, containing the public key the credential
/// is bound to.
///
/// See [RFC7800] for details.
///
/// [RFC7800]: https://www.rfc-editor.org/rfc/rfc7800.html#section-3
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CnfClaim {
    /// Public key bound to the credential.
    pub jwk: JwkPublic,
}

/// A JSON object, i.e. a mapping from [`String`] to [`Value`].
pub type JsonObject = Map<String, Value>;

/// Number of whole seconds since the UNIX epoch.
pub type SecondsSinceEpoch = u64;

/// Panics if the argument is not a JSON object.
#[inline(always)]
pub(crate) fn into_object(value: Value) -> JsonObject {
    if let Value::Object(object) = value {
        object
    } else {
        panic!("Argument wasn't an object")
    }
}

pub(crate) const SD: &str = "_sd";
pub(crate) const SD_ALG: &str = "_sd_alg";
pub(crate) const ELLIPSIS: &str = "...";
pub(crate) const ID: &str = "id";

/// Claim names a template may not declare, since the credential format
/// already gives them a meaning.
pub(crate) static RESERVED_CLAIM_NAMES: &[&str] = &[SD, SD_ALG, ELLIPSIS, ID];

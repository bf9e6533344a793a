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

//! Claim value resolution for template claim definitions.

use std::collections::HashMap;

use serde_json::Value;

use crate::{template::ClaimDefinition, JsonObject};

/// Pairs of claim keys that name the same attribute. Lookups fall back from
/// either side of a pair to the other.
pub const CLAIM_ALIASES: &[(&str, &str)] = &[
    ("name", "fullName"),
    ("department", "faculty"),
    ("studentId", "studentNumber"),
    ("birthDate", "dateOfBirth"),
    ("email", "mail"),
];

lazy_static::lazy_static! {
    static ref ALIASES_BY_KEY: HashMap<&'static str, Vec<&'static str>> = {
        let mut aliases: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for &(left, right) in CLAIM_ALIASES {
            aliases.entry(left).or_default().push(right);
            aliases.entry(right).or_default().push(left);
        }
        aliases
    };
}

/// Returns the alternative keys under which the value of `claim_key` may be
/// found.
pub fn aliases_of(claim_key: &str) -> &'static [&'static str] {
    ALIASES_BY_KEY
        .get(claim_key)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Where a resolved claim value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClaimOrigin {
    Override,
    Claims,
    Alias(&'static str),
    Default,
}

/// A `null` or empty string value counts as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

/// Resolves the value of a template claim: an explicit override for the key,
/// then the subject's claims by key, then the aliases of the key (overrides
/// before claims), then the template default.
pub(crate) fn resolve_claim<'a>(
    definition: &'a ClaimDefinition,
    overrides: &'a JsonObject,
    claims: &'a JsonObject,
) -> Option<(&'a Value, ClaimOrigin)> {
    let key = definition.key.as_str();

    if let Some(value) = present(overrides.get(key)) {
        return Some((value, ClaimOrigin::Override));
    }
    if let Some(value) = present(claims.get(key)) {
        return Some((value, ClaimOrigin::Claims));
    }
    for &alias in aliases_of(key) {
        if let Some(value) = present(overrides.get(alias)).or(present(claims.get(alias))) {
            return Some((value, ClaimOrigin::Alias(alias)));
        }
    }

    present(definition.default_value.as_ref()).map(|value| (value, ClaimOrigin::Default))
}

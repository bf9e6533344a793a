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

//! This module provides the [`Holder`] type for presenting a subset of the
//! disclosures of a held credential.

use std::collections::HashSet;

use crate::{
    decoder::decode_sd_jwt,
    error::{FormatError, Result},
    sd_jwt::SdJwt,
    DecodedCredential, DisclosureEntry, JsonObject,
};

/// A credential held by its subject, ready to be presented with selected
/// claims only.
///
/// Presenting never touches the issuer-signed JWT; it only chooses which of
/// the original disclosures accompany it, so the signature stays valid.
#[derive(Debug, Clone)]
pub struct Holder {
    credential: DecodedCredential,
}

impl Holder {
    /// Import a credential in compact form.
    ///
    /// The signature is not verified here.
    pub fn import(sd_jwt: &str) -> Result<Self, FormatError> {
        let sd_jwt: SdJwt = sd_jwt.parse()?;

        Ok(Self {
            credential: decode_sd_jwt(&sd_jwt)?,
        })
    }

    /// The decoded credential.
    pub fn credential(&self) -> &DecodedCredential {
        &self.credential
    }

    /// All the claims of the credential, embedded and disclosed.
    pub fn claims(&self) -> &JsonObject {
        self.credential.reconstructed_claims()
    }

    /// Names of the claims that may be left out of a presentation.
    pub fn disclosable_claim_names(&self) -> Vec<&str> {
        self.credential.disclosed_claim_names()
    }

    /// Produce a presentation carrying only the disclosures of the named
    /// claims, in their original order and exact original form.
    ///
    /// Names without a matching disclosure are ignored, as are disclosures
    /// that could not be decoded.
    pub fn present<S: AsRef<str>>(&self, claim_names: &[S]) -> String {
        let claim_names: HashSet<&str> = claim_names.iter().map(AsRef::as_ref).collect();

        let disclosures = self
            .credential
            .disclosures()
            .iter()
            .filter(|entry| {
                entry
                    .claim_name()
                    .is_some_and(|name| claim_names.contains(name))
            })
            .map(DisclosureEntry::as_str)
            .map(str::to_owned)
            .collect();

        SdJwt::new(self.credential.jwt().to_owned(), disclosures).to_string()
    }
}

/// Reduce a credential in compact form to the disclosures of the named
/// claims, leaving the issuer-signed JWT byte-identical.
///
/// Re-disclosing an already reduced credential with the same names yields
/// the same string.
///
/// # Errors
///
/// Fails with the same [`FormatError`]s as
/// [`decode_credential`](crate::decode_credential).
pub fn redisclose_credential<S: AsRef<str>>(
    sd_jwt: &str,
    claim_names: &[S],
) -> Result<String, FormatError> {
    Ok(Holder::import(sd_jwt)?.present(claim_names))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{decode_credential, json_object, test_utils::issue_student_credential, Disclosure};

    fn jwt_part(sd_jwt: &str) -> &str {
        sd_jwt.split('~').next().unwrap()
    }

    #[test]
    fn holder_exposes_claims() {
        let holder = Holder::import(&issue_student_credential()).unwrap();

        assert_eq!(
            holder.claims(),
            &json_object!({
                "id": "did:example:S12345678",
                "department": "工学部",
                "name": "山田太郎",
                "studentId": "S12345678",
            })
        );
        assert_eq!(holder.disclosable_claim_names(), vec!["name", "studentId"]);
        assert_eq!(holder.credential().disclosures().len(), 2);
    }

    #[test]
    fn redisclose_subset() {
        let sd_jwt = issue_student_credential();

        let presented = redisclose_credential(&sd_jwt, &["studentId"]).unwrap();

        assert_eq!(jwt_part(&presented), jwt_part(&sd_jwt));
        assert!(presented.ends_with('~'));

        let decoded = decode_credential(&presented).unwrap();
        assert_eq!(
            decoded.reconstructed_claims(),
            &json_object!({
                "id": "did:example:S12345678",
                "department": "工学部",
                "studentId": "S12345678",
            })
        );
        assert_eq!(decoded.disclosures().len(), 1);
    }

    #[test]
    fn redisclose_keeps_original_wire_forms() {
        let sd_jwt = issue_student_credential();

        let presented = redisclose_credential(&sd_jwt, &["name", "studentId"]).unwrap();

        assert_eq!(presented, sd_jwt);
    }

    #[test]
    fn redisclose_is_idempotent() {
        let sd_jwt = issue_student_credential();

        let once = redisclose_credential(&sd_jwt, &["name"]).unwrap();
        let twice = redisclose_credential(&once, &["name"]).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn redisclose_nothing() {
        let sd_jwt = issue_student_credential();

        let presented = redisclose_credential::<&str>(&sd_jwt, &[]).unwrap();

        assert_eq!(presented, format!("{}~", jwt_part(&sd_jwt)));
    }

    #[test]
    fn unknown_names_are_ignored() {
        let sd_jwt = issue_student_credential();

        let presented = redisclose_credential(&sd_jwt, &["gpa", "department"]).unwrap();

        assert_eq!(presented, format!("{}~", jwt_part(&sd_jwt)));
    }

    #[test]
    fn invalid_disclosures_are_dropped() {
        let sd_jwt = issue_student_credential();
        let corrupted = format!("{sd_jwt}!!!invalid!!!~");

        let presented =
            redisclose_credential(&corrupted, &["name", "studentId", "<invalid>"]).unwrap();

        assert_eq!(presented, sd_jwt);
    }

    #[test]
    fn unreferenced_disclosures_follow_their_name() {
        let sd_jwt = issue_student_credential();
        let gpa = Disclosure::new("salt".to_owned(), "gpa".to_owned(), json!(3.8));
        let forged = format!("{sd_jwt}{}~", gpa.as_str());

        let presented = redisclose_credential(&forged, &["gpa"]).unwrap();

        assert_eq!(presented, format!("{}~{}~", jwt_part(&sd_jwt), gpa.as_str()));
    }

    #[test]
    fn redisclose_propagates_format_errors() {
        assert_eq!(
            redisclose_credential("not-a-valid-sdjwt", &["name"])
                .unwrap_err()
                .error,
            FormatError::MalformedSdJwt
        );
        assert_eq!(
            redisclose_credential("a.b~", &["name"]).unwrap_err().error,
            FormatError::MalformedJwt
        );
    }
}

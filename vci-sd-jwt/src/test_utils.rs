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

use bherror::Error;
use rand::{rngs::StdRng, SeedableRng};
use vci_jws_utils::JwkPublic;

use crate::{
    iref::UriBuf,
    issuer::{CredentialRequest, Issuer},
    json_object,
    lookup::LookupError,
    template::{ClaimDefinition, CredentialTemplate},
    IssuerJwtHeader, IssuerPublicKeyLookup, IssuerSettings, JsonObject, SecondsSinceEpoch, Sha256,
};
pub(crate) mod symbolic_crypto;

pub(crate) use symbolic_crypto::ISSUER_KID;

pub(crate) const ISSUER_ID: &str = "https://university.example.edu";

/// Current time in seconds from the UNIX epoch.
pub(crate) const NOW: SecondsSinceEpoch = 1_700_000_000;

pub(crate) const SUBJECT_ID: &str = "S12345678";

pub(crate) fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub(crate) fn holder_public_jwk() -> JwkPublic {
    json_object!({
        "kty": "EC",
        "crv": "P-256",
        "x": "TCAER19Zvu3OHF4j4W4vfSVoHIP1ILilDls7vCeGemc",
        "y": "ZxjiWWbZMQGHVWKVQ4hbSIirsVfuecCE6t4jT9F2HZQ",
    })
}

pub(crate) fn issuer_settings() -> IssuerSettings {
    IssuerSettings::new(ISSUER_KID.to_owned()).with_holder_binding_jwk(holder_public_jwk())
}

pub(crate) fn dummy_issuer() -> Issuer<Sha256> {
    Issuer::new(Sha256, issuer_settings())
}

pub(crate) fn claim(key: &str, required: bool, selective_disclosure: bool) -> ClaimDefinition {
    ClaimDefinition {
        key: key.to_owned(),
        required,
        selective_disclosure,
        default_value: None,
        display: Vec::new(),
    }
}

pub(crate) fn template_with_claims(claims: Vec<ClaimDefinition>) -> CredentialTemplate {
    CredentialTemplate {
        id: "UniversityStudentCredential".to_owned(),
        issuer: UriBuf::new(ISSUER_ID.into()).unwrap(),
        validity_period_days: 365,
        context: vec!["https://www.w3.org/2018/credentials/v1".to_owned()],
        types: vec![
            "VerifiableCredential".to_owned(),
            "UniversityStudentCredential".to_owned(),
        ],
        claims,
        display: Vec::new(),
    }
}

/// `name` and `studentId` are selectively disclosable, `department` is
/// embedded.
pub(crate) fn student_id_template() -> CredentialTemplate {
    template_with_claims(vec![
        claim("name", true, true),
        claim("studentId", true, true),
        claim("department", true, false),
    ])
}

pub(crate) fn student_claims() -> JsonObject {
    json_object!({
        "name": "山田太郎",
        "studentId": "S12345678",
        "department": "工学部",
    })
}

/// The student ID credential of [`SUBJECT_ID`] in compact form, issued at
/// [`NOW`].
pub(crate) fn issue_student_credential() -> String {
    dummy_issuer()
        .issue(
            &CredentialRequest::new(SUBJECT_ID.to_owned(), student_claims()),
            &student_id_template(),
            &symbolic_crypto::StubSigner::default(),
            NOW,
            &mut seeded_rng(),
        )
        .unwrap()
        .into_string_compact()
}

pub(crate) fn dummy_public_key_lookup() -> impl IssuerPublicKeyLookup {
    struct Lookup;

    impl IssuerPublicKeyLookup for Lookup {
        type Err = LookupError;

        fn lookup(
            &self,
            _alleged_iss: &str,
            _header: &IssuerJwtHeader,
        ) -> Result<JwkPublic, Error<Self::Err>> {
            // Ignore the `iss` claim and the header entirely - for more sophisticated tests,
            // a more detailed implementation is needed
            Ok(symbolic_crypto::dummy_public_jwk())
        }
    }

    Lookup
}

pub(crate) fn failing_public_key_lookup() -> impl IssuerPublicKeyLookup {
    struct FailingLookup;

    impl IssuerPublicKeyLookup for FailingLookup {
        type Err = LookupError;

        fn lookup(
            &self,
            alleged_iss: &str,
            _header: &IssuerJwtHeader,
        ) -> Result<JwkPublic, Error<Self::Err>> {
            Err(Error::root(LookupError::UnknownIssuer(
                alleged_iss.to_owned(),
            )))
        }
    }

    FailingLookup
}

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

//! Issues a student ID credential, presents it with the name withheld and
//! verifies the presentation.
//!
//! Run with `cargo run --example university-credential`.

use std::time::{SystemTime, UNIX_EPOCH};

use vci_sd_jwt::{
    holder::Holder,
    issuer::{CredentialRequest, Issuer},
    json_object,
    lookup::InMemoryKeyLookup,
    template::InMemoryTemplateResolver,
    verifier::Verifier,
    vci_jws_utils::{Es256Signer, Es256Verifier, JwkSet},
    IssuerSettings, TemplateResolver,
};

const TEMPLATES: &str = r#"[
    {
        "id": "UniversityStudentCredential",
        "issuer": "https://university.example.edu",
        "validityPeriodDays": 365,
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "type": ["VerifiableCredential", "UniversityStudentCredential"],
        "claims": [
            {"key": "name", "required": true, "selectiveDisclosure": true},
            {"key": "studentId", "required": true, "selectiveDisclosure": true},
            {"key": "department", "required": true, "selectiveDisclosure": false},
            {"key": "enrollmentStatus", "selectiveDisclosure": true, "defaultValue": "enrolled"}
        ]
    }
]"#;

const SETTINGS: &str = r#"{
    "kid": "university-issuer-1",
    "subjectDidPrefix": "did:example:student:"
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let settings = IssuerSettings::from_json(SETTINGS)?;
    let signer = Es256Signer::generate(settings.kid.clone())?;
    let templates = InMemoryTemplateResolver::from_json(TEMPLATES)?;
    let template = templates.resolve("UniversityStudentCredential")?;

    // Attributes as released by the login session; `fullName` and `faculty`
    // stand in for `name` and `department`.
    let request = CredentialRequest::new(
        "S12345678".to_owned(),
        json_object!({
            "fullName": "山田太郎",
            "studentId": "S12345678",
            "faculty": "工学部",
        }),
    );

    let issued = Issuer::from_settings(settings).issue(
        &request,
        &template,
        &signer,
        now,
        &mut rand::thread_rng(),
    )?;
    println!("Issued payload:");
    println!("{}", serde_json::to_string_pretty(&issued.payload().to_object())?);

    let sd_jwt = issued.into_string_compact();
    println!("\nCredential:\n{sd_jwt}");

    let holder = Holder::import(&sd_jwt)?;
    println!(
        "\nDisclosable claims: {}",
        holder.disclosable_claim_names().join(", ")
    );

    let presentation = holder.present(&["studentId", "enrollmentStatus"]);
    println!("\nPresentation:\n{presentation}");

    let key_lookup = InMemoryKeyLookup::new().with_issuer(
        template.issuer.as_str(),
        JwkSet::new(vec![signer.public_jwk()?])?,
    );
    let verified = Verifier::new(key_lookup)
        .with_signature_verifier(Es256Verifier)
        .verify(&presentation, now)?;

    println!("\nVerification status: {}", verified.status);
    println!(
        "Presented claims:\n{}",
        serde_json::to_string_pretty(verified.credential.reconstructed_claims())?
    );

    Ok(())
}

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

//! Provides the [`Issuer`] type for assembling SD-JWT credentials from a
//! [`CredentialTemplate`] and the subject's claims.

use std::collections::HashSet;

use bherror::{
    traits::{ErrorContext as _, ForeignBoxed as _},
    Error,
};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vci_jws_utils::{base64_url_encode, jws_signing_input, Signer, SigningAlgorithm};

use crate::{
    claims::{aliases_of, resolve_claim, ClaimOrigin},
    models::{ID, RESERVED_CLAIM_NAMES},
    sd_jwt::SdJwt,
    template::CredentialTemplate,
    utils::VecDisplayWrapper,
    ClaimSource, CnfClaim, Digest, Disclosure, Hasher, HashingAlgorithm, IssuerSettings,
    JsonObject, SecondsSinceEpoch,
};

/// Number of random bytes in a disclosure salt.
const SALT_ENTROPY_BYTES: usize = 16;

/// Value to set for the [`typ`][IssuerJwtHeader::typ] header parameter when
/// issuing an SD-JWT verifiable credential.
pub const TYP_VC_SD_JWT: &str = "vc+sd-jwt";

/// Issuer of university credentials with selectively disclosable claims.
pub struct Issuer<H: Hasher> {
    hasher: H,
    settings: IssuerSettings,
}

/// Error type related to the Issuer operations.
#[derive(strum_macros::Display, Debug, PartialEq, Eq)]
pub enum IssuerError {
    /// A required template claim resolved to no value.
    #[strum(to_string = "Missing required claim {0}")]
    MissingRequiredClaim(String),

    /// The template declares the same claim key more than once.
    #[strum(to_string = "Duplicate claim key {0}")]
    DuplicateClaimKey(String),

    /// The template declares a claim key the credential format reserves.
    #[strum(to_string = "Use of reserved claim name {0}")]
    ReservedClaimName(String),

    /// The expiry time does not fit in [`SecondsSinceEpoch`].
    #[strum(to_string = "Expiry out of range: issued at {0}")]
    ExpiryOutOfRange(SecondsSinceEpoch),

    /// Error indicating that the signing of the JWT failed.
    #[strum(to_string = "Signing failed")]
    SigningFailed,
}

impl bherror::BhError for IssuerError {}

/// Result type used by the [`issuer`][crate::issuer] module.
pub type Result<T> = bherror::Result<T, IssuerError>;

/// JWT Header of an issued credential.
///
/// Header field values will be used to lookup the public key of the Issuer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuerJwtHeader {
    /// Algorithm used to sign the payload.
    pub alg: SigningAlgorithm,

    /// Type of the payload; its value *must* be [`TYP_VC_SD_JWT`].
    pub typ: String,

    /// Identifier of the key used for signing.
    pub kid: String,
}

/// Payload of the issuer-signed JWT.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct IssuerJwt {
    /// Issuer of the credential.
    pub iss: String,

    /// Subject the credential was issued to.
    pub sub: String,

    /// Time of issuance.
    pub iat: SecondsSinceEpoch,

    /// Expiry time of the credential.
    pub exp: SecondsSinceEpoch,

    /// Holder's public JWK for key binding purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnf: Option<CnfClaim>,

    /// The verifiable credential itself, holding the embedded claims.
    pub vc: VcClaim,

    /// Digests of the disclosures the issuer commits to.
    #[serde(rename = "_sd", default)]
    pub sd: Vec<Digest>,

    /// The hash algorithm used for the `_sd` digests.
    #[serde(rename = "_sd_alg", default, skip_serializing_if = "Option::is_none")]
    pub sd_alg: Option<HashingAlgorithm>,
}

/// The `vc` claim of the payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VcClaim {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential types.
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Claims that are always visible: the subject identifier and every
    /// claim that is not selectively disclosable.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: JsonObject,
}

impl IssuerJwt {
    /// Serializes the Issuer's JWT into a `JSON` object.
    pub fn to_object(&self) -> JsonObject {
        crate::into_object(
            serde_json::to_value(self).expect("Implementation error: cannot serialize as JSON"),
        )
    }
}

/// The subject and claim values a credential is issued for.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CredentialRequest {
    subject_id: String,
    claims: JsonObject,
    overrides: JsonObject,
    selected_claim_keys: Option<HashSet<String>>,
}

impl CredentialRequest {
    /// Request a credential for `subject_id` with the given resolved claims.
    pub fn new(subject_id: String, claims: JsonObject) -> Self {
        Self {
            subject_id,
            claims,
            overrides: JsonObject::new(),
            selected_claim_keys: None,
        }
    }

    /// Collect the values of the template's claims, and of their aliases,
    /// from `source`.
    pub fn from_source(
        subject_id: String,
        source: &impl ClaimSource,
        template: &CredentialTemplate,
    ) -> Self {
        let mut claims = JsonObject::new();

        for definition in &template.claims {
            let key = definition.key.as_str();
            for candidate in std::iter::once(key).chain(aliases_of(key).iter().copied()) {
                if claims.contains_key(candidate) {
                    continue;
                }
                if let Some(value) = source.resolve(&subject_id, candidate) {
                    claims.insert(candidate.to_owned(), value);
                }
            }
        }

        Self::new(subject_id, claims)
    }

    /// Values that take precedence over the resolved claims.
    pub fn with_overrides(mut self, overrides: JsonObject) -> Self {
        self.overrides = overrides;
        self
    }

    /// Only disclose the selectively disclosable claims whose keys are
    /// listed. Embedded claims are not affected.
    pub fn with_selected_claim_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.selected_claim_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Identifier of the subject.
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    fn is_selected(&self, key: &str) -> bool {
        self.selected_claim_keys
            .as_ref()
            .map_or(true, |keys| keys.contains(key))
    }
}

/// A freshly issued credential, in parsed form.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    header: IssuerJwtHeader,
    payload: IssuerJwt,
    jwt: String,
    disclosures: Vec<Disclosure>,
}

impl IssuedCredential {
    /// The JOSE header of the issuer-signed JWT.
    pub fn header(&self) -> &IssuerJwtHeader {
        &self.header
    }

    /// The payload of the issuer-signed JWT.
    pub fn payload(&self) -> &IssuerJwt {
        &self.payload
    }

    /// The issuer-signed JWT in compact form.
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    /// Disclosures of the selectively disclosable claims, in template order.
    pub fn disclosures(&self) -> &[Disclosure] {
        &self.disclosures
    }

    /// Serialize the issued credential into the compact format,
    /// `<JWT>~<Disclosure 1>~...~<Disclosure N>~`.
    pub fn into_string_compact(self) -> String {
        SdJwt::new(
            self.jwt,
            self.disclosures
                .into_iter()
                .map(Disclosure::into_string)
                .collect(),
        )
        .to_string()
    }
}

impl<H: Hasher> Issuer<H> {
    /// Construct a new [`Issuer`] with the given [`Hasher`] and settings.
    pub fn new(hasher: H, settings: IssuerSettings) -> Self {
        Self { hasher, settings }
    }

    /// The settings of this issuer.
    pub fn settings(&self) -> &IssuerSettings {
        &self.settings
    }

    /// Assemble and sign a credential of the given template for the request.
    ///
    /// Every template claim is resolved from the request (see
    /// [`CLAIM_ALIASES`](crate::CLAIM_ALIASES) for the fallback keys).
    /// Selectively disclosable claims become disclosures in template order;
    /// all others are embedded in `vc.credentialSubject`. The signature is
    /// obtained from `signer` for the key named in the settings.
    ///
    /// # Errors
    ///
    /// Nothing is returned unless every step succeeds; a missing required
    /// claim, an invalid template or a signing failure abort issuance.
    pub fn issue<S: Signer + ?Sized, R: CryptoRngCore + ?Sized>(
        &self,
        request: &CredentialRequest,
        template: &CredentialTemplate,
        signer: &S,
        now: SecondsSinceEpoch,
        rng: &mut R,
    ) -> Result<IssuedCredential> {
        check_template_claims(template)?;

        let mut credential_subject = JsonObject::new();
        credential_subject.insert(
            ID.to_owned(),
            self.settings.subject_did(&request.subject_id).into(),
        );

        let mut disclosures = Vec::new();
        let mut salts = HashSet::new();

        for definition in &template.claims {
            let Some((value, origin)) =
                resolve_claim(definition, &request.overrides, &request.claims)
            else {
                if definition.required {
                    return Err(Error::root(IssuerError::MissingRequiredClaim(
                        definition.key.clone(),
                    )))
                    .ctx(|| format!("template {}", template.id));
                }
                continue;
            };

            if let ClaimOrigin::Alias(alias) = origin {
                debug!("claim {} resolved from alias {}", definition.key, alias);
            }

            if !definition.selective_disclosure {
                credential_subject.insert(definition.key.clone(), value.clone());
            } else if request.is_selected(&definition.key) {
                let salt = generate_unique_salt(rng, &mut salts);
                disclosures.push(Disclosure::new(
                    salt,
                    definition.key.clone(),
                    value.clone(),
                ));
            }
        }

        let exp = now
            .checked_add(template.validity_period_seconds())
            .ok_or_else(|| Error::root(IssuerError::ExpiryOutOfRange(now)))
            .ctx(|| format!("template {}", template.id))?;

        let payload = IssuerJwt {
            iss: template.issuer.to_string(),
            sub: request.subject_id.clone(),
            iat: now,
            exp,
            cnf: self
                .settings
                .holder_binding_jwk
                .clone()
                .map(|jwk| CnfClaim { jwk }),
            vc: VcClaim {
                context: template.context.clone(),
                types: template.types.clone(),
                credential_subject,
            },
            sd: disclosures
                .iter()
                .map(|disclosure| disclosure.digest(&self.hasher))
                .collect(),
            sd_alg: Some(self.hasher.algorithm()),
        };

        let header = IssuerJwtHeader {
            alg: signer.algorithm(),
            typ: TYP_VC_SD_JWT.to_owned(),
            kid: self.settings.kid.clone(),
        };

        let signing_input = jws_signing_input(&encode_segment(&header), &encode_segment(&payload));
        let signature = signer
            .sign(&signing_input, &header.kid)
            .foreign_boxed_err(|| IssuerError::SigningFailed)
            .ctx(|| format!("signing with key {}", header.kid))?;

        debug!(
            "issued {} for {}, disclosed claims: [{}]",
            template.id,
            request.subject_id,
            VecDisplayWrapper(
                disclosures
                    .iter()
                    .map(Disclosure::claim_name)
                    .collect::<Vec<_>>()
            )
        );

        Ok(IssuedCredential {
            jwt: format!("{signing_input}.{signature}"),
            header,
            payload,
            disclosures,
        })
    }

    /// Assemble and sign a credential for `subject_id`, collecting the claim
    /// values from `source` instead of a prebuilt map.
    ///
    /// See [`CredentialRequest::from_source`] and [`Issuer::issue`].
    pub fn issue_from_source<S: Signer + ?Sized, R: CryptoRngCore + ?Sized>(
        &self,
        subject_id: &str,
        source: &impl ClaimSource,
        template: &CredentialTemplate,
        signer: &S,
        now: SecondsSinceEpoch,
        rng: &mut R,
    ) -> Result<IssuedCredential> {
        let request = CredentialRequest::from_source(subject_id.to_owned(), source, template);

        self.issue(&request, template, signer, now, rng)
    }
}

impl Issuer<Box<dyn Hasher>> {
    /// Construct an [`Issuer`] hashing with the algorithm named in the
    /// settings.
    pub fn from_settings(settings: IssuerSettings) -> Self {
        Self::new(settings.hashing_algorithm.hasher(), settings)
    }
}

/// Assemble a credential and return it in compact form.
///
/// Equivalent to [`Issuer::issue`] with an issuer built by
/// [`Issuer::from_settings`].
pub fn assemble_credential<S: Signer + ?Sized, R: CryptoRngCore + ?Sized>(
    request: &CredentialRequest,
    template: &CredentialTemplate,
    settings: &IssuerSettings,
    signer: &S,
    now: SecondsSinceEpoch,
    rng: &mut R,
) -> Result<String> {
    Issuer::from_settings(settings.clone())
        .issue(request, template, signer, now, rng)
        .map(IssuedCredential::into_string_compact)
}

/// Template claim keys must be unique and must not be reserved.
fn check_template_claims(template: &CredentialTemplate) -> Result<()> {
    let mut keys = HashSet::new();

    for definition in &template.claims {
        let key = definition.key.as_str();
        if RESERVED_CLAIM_NAMES.contains(&key) {
            return Err(Error::root(IssuerError::ReservedClaimName(key.to_owned())))
                .ctx(|| format!("template {}", template.id));
        }
        if !keys.insert(key) {
            return Err(Error::root(IssuerError::DuplicateClaimKey(key.to_owned())))
                .ctx(|| format!("template {}", template.id));
        }
    }

    Ok(())
}

fn encode_segment<T: Serialize>(value: &T) -> String {
    base64_url_encode(
        serde_json::to_vec(value).expect("Implementation error: cannot serialize as JSON"),
    )
}

/// Generate a base64url string of random bytes as a salt for disclosure
/// hashing, distinct from every salt already in `used`.
fn generate_unique_salt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    used: &mut HashSet<String>,
) -> String {
    loop {
        let mut salt = [0; SALT_ENTROPY_BYTES];
        rng.fill_bytes(&mut salt);
        let salt = base64_url_encode(salt);

        if used.insert(salt.clone()) {
            return salt;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::{
        decode_credential, json_object,
        test_utils::{
            claim, dummy_issuer, holder_public_jwk, issue_student_credential, issuer_settings,
            seeded_rng, student_claims, student_id_template, symbolic_crypto::StubSigner,
            template_with_claims, ISSUER_ID, ISSUER_KID, NOW, SUBJECT_ID,
        },
        Sha256,
    };

    fn issue(
        request: &CredentialRequest,
        template: &CredentialTemplate,
    ) -> Result<IssuedCredential> {
        dummy_issuer().issue(
            request,
            template,
            &StubSigner::default(),
            NOW,
            &mut seeded_rng(),
        )
    }

    fn student_request() -> CredentialRequest {
        CredentialRequest::new(SUBJECT_ID.to_owned(), student_claims())
    }

    #[test]
    fn issue_partitions_embedded_and_disclosed_claims() {
        let issued = issue(&student_request(), &student_id_template()).unwrap();

        let payload = issued.payload();
        assert_eq!(payload.iss, ISSUER_ID);
        assert_eq!(payload.sub, SUBJECT_ID);
        assert_eq!(
            payload.vc.credential_subject,
            json_object!({"id": "did:example:S12345678", "department": "工学部"})
        );
        assert_eq!(payload.sd.len(), 2);
        assert_eq!(payload.sd_alg, Some(HashingAlgorithm::Sha256));
        assert_eq!(payload.cnf, Some(CnfClaim { jwk: holder_public_jwk() }));

        let names: Vec<&str> = issued
            .disclosures()
            .iter()
            .map(Disclosure::claim_name)
            .collect();
        assert_eq!(names, vec!["name", "studentId"]);
        assert_eq!(issued.disclosures()[0].value(), &json!("山田太郎"));

        for (disclosure, digest) in issued.disclosures().iter().zip(&payload.sd) {
            assert_eq!(&disclosure.digest(Sha256), digest);
        }
    }

    #[test]
    fn issue_sets_header() {
        let issued = issue(&student_request(), &student_id_template()).unwrap();

        assert_eq!(
            issued.header(),
            &IssuerJwtHeader {
                alg: SigningAlgorithm::Es256,
                typ: TYP_VC_SD_JWT.to_owned(),
                kid: ISSUER_KID.to_owned(),
            }
        );
    }

    #[test]
    fn issue_then_decode_round_trip() {
        let decoded = decode_credential(&issue_student_credential()).unwrap();

        let mut expected = student_claims();
        expected.insert("id".to_owned(), json!("did:example:S12345678"));
        assert_eq!(decoded.reconstructed_claims(), &expected);

        let subject = decoded.credential_subject().unwrap();
        assert!(subject.contains_key("department"));
        assert!(!subject.contains_key("name"));
        assert!(!subject.contains_key("studentId"));
    }

    #[test]
    fn payload_serializes_in_wire_order() {
        let issued = issue(&student_request(), &student_id_template()).unwrap();

        let keys: Vec<String> = issued.payload().to_object().keys().cloned().collect();

        assert_eq!(
            keys,
            vec!["iss", "sub", "iat", "exp", "cnf", "vc", "_sd", "_sd_alg"]
        );
        assert_eq!(
            issued.payload().to_object()["vc"]["@context"],
            json!(["https://www.w3.org/2018/credentials/v1"])
        );
    }

    #[test]
    fn compact_form_ends_with_delimiter() {
        let issued = issue(&student_request(), &student_id_template()).unwrap();
        let jwt = issued.jwt().to_owned();
        let disclosures: Vec<String> = issued
            .disclosures()
            .iter()
            .map(|disclosure| disclosure.as_str().to_owned())
            .collect();

        let compact = issued.into_string_compact();

        assert_eq!(
            compact,
            format!("{}~{}~{}~", jwt, disclosures[0], disclosures[1])
        );
        assert_eq!(jwt.split('.').count(), 3);
    }

    #[test]
    fn expiry_follows_validity_period() {
        let mut template = student_id_template();
        template.validity_period_days = 30;

        let issued = issue(&student_request(), &template).unwrap();

        assert_eq!(issued.payload().iat, NOW);
        assert_eq!(issued.payload().exp, NOW + 30 * 86_400);
    }

    #[test]
    fn expiry_out_of_range() {
        let now = SecondsSinceEpoch::MAX - 1;

        let error = dummy_issuer()
            .issue(
                &student_request(),
                &student_id_template(),
                &StubSigner::default(),
                now,
                &mut seeded_rng(),
            )
            .unwrap_err();

        assert_eq!(error.error, IssuerError::ExpiryOutOfRange(now));
    }

    #[test]
    fn missing_required_claim() {
        let mut claims = student_claims();
        claims.remove("studentId");

        let error = issue(
            &CredentialRequest::new(SUBJECT_ID.to_owned(), claims),
            &student_id_template(),
        )
        .unwrap_err();

        assert_eq!(
            error.error,
            IssuerError::MissingRequiredClaim("studentId".to_owned())
        );
    }

    #[test]
    fn missing_optional_claim_is_skipped() {
        let template = template_with_claims(vec![
            claim("name", true, true),
            claim("email", false, true),
            claim("faculty", false, false),
        ]);

        let issued = issue(
            &CredentialRequest::new(SUBJECT_ID.to_owned(), json_object!({"name": "山田太郎"})),
            &template,
        )
        .unwrap();

        assert_eq!(issued.disclosures().len(), 1);
        assert_eq!(issued.payload().sd.len(), 1);
        assert_eq!(
            issued.payload().vc.credential_subject,
            json_object!({"id": "did:example:S12345678"})
        );
    }

    #[test]
    fn aliases_satisfy_template_keys() {
        let claims = json_object!({
            "fullName": "山田太郎",
            "studentNumber": "S12345678",
            "faculty": "工学部",
        });

        let issued = issue(
            &CredentialRequest::new(SUBJECT_ID.to_owned(), claims),
            &student_id_template(),
        )
        .unwrap();

        let names: Vec<&str> = issued
            .disclosures()
            .iter()
            .map(Disclosure::claim_name)
            .collect();
        assert_eq!(names, vec!["name", "studentId"]);
        assert_eq!(
            issued.payload().vc.credential_subject["department"],
            "工学部"
        );
    }

    #[test]
    fn overrides_and_defaults() {
        let mut department = claim("department", true, false);
        department.default_value = Some(json!("教養学部"));
        let mut status = claim("enrollmentStatus", true, true);
        status.default_value = Some(json!("enrolled"));
        let template = template_with_claims(vec![claim("name", true, true), department, status]);

        let request = CredentialRequest::new(SUBJECT_ID.to_owned(), student_claims())
            .with_overrides(json_object!({"name": "Taro Yamada"}));
        let issued = issue(&request, &template).unwrap();

        assert_eq!(issued.disclosures()[0].value(), &json!("Taro Yamada"));
        assert_eq!(issued.disclosures()[1].claim_name(), "enrollmentStatus");
        assert_eq!(issued.disclosures()[1].value(), &json!("enrolled"));
        // the subject's own value wins over the template default
        assert_eq!(
            issued.payload().vc.credential_subject["department"],
            "工学部"
        );
    }

    #[test]
    fn selected_claim_keys_restrict_only_disclosures() {
        let request = student_request().with_selected_claim_keys(["studentId", "department"]);

        let issued = issue(&request, &student_id_template()).unwrap();

        assert_eq!(issued.disclosures().len(), 1);
        assert_eq!(issued.disclosures()[0].claim_name(), "studentId");
        assert_eq!(issued.payload().sd.len(), 1);
        assert_eq!(
            issued.payload().vc.credential_subject["department"],
            "工学部"
        );

        let issued = issue(
            &student_request().with_selected_claim_keys(Vec::<String>::new()),
            &student_id_template(),
        )
        .unwrap();
        assert!(issued.disclosures().is_empty());
        assert!(issued.payload().sd.is_empty());
        assert!(issued
            .payload()
            .vc
            .credential_subject
            .contains_key("department"));
    }

    #[test]
    fn selected_claim_keys_do_not_waive_required_claims() {
        let mut claims = student_claims();
        claims.remove("name");

        let error = issue(
            &CredentialRequest::new(SUBJECT_ID.to_owned(), claims)
                .with_selected_claim_keys(["studentId"]),
            &student_id_template(),
        )
        .unwrap_err();

        assert_eq!(
            error.error,
            IssuerError::MissingRequiredClaim("name".to_owned())
        );
    }

    #[test]
    fn duplicate_claim_key_is_rejected() {
        let template = template_with_claims(vec![
            claim("name", true, true),
            claim("name", false, false),
        ]);

        let error = issue(&student_request(), &template).unwrap_err();

        assert_eq!(
            error.error,
            IssuerError::DuplicateClaimKey("name".to_owned())
        );
    }

    #[test]
    fn reserved_claim_name_is_rejected() {
        for reserved in ["_sd", "_sd_alg", "...", "id"] {
            let template = template_with_claims(vec![claim(reserved, false, true)]);

            let error = issue(&student_request(), &template).unwrap_err();

            assert_eq!(
                error.error,
                IssuerError::ReservedClaimName(reserved.to_owned())
            );
        }
    }

    #[test]
    fn signing_failure_aborts_issuance() {
        let settings = IssuerSettings::new("unknown-key".to_owned());

        let error = Issuer::new(Sha256, settings)
            .issue(
                &student_request(),
                &student_id_template(),
                &StubSigner::default(),
                NOW,
                &mut seeded_rng(),
            )
            .unwrap_err();

        assert_eq!(error.error, IssuerError::SigningFailed);
    }

    #[test]
    fn salts_are_unique_and_fresh() {
        let template = template_with_claims(
            ["name", "studentId", "email", "birthDate", "gpa"]
                .into_iter()
                .map(|key| claim(key, true, true))
                .collect(),
        );
        let claims = json_object!({
            "name": "山田太郎",
            "studentId": "S12345678",
            "email": "taro@university.example.edu",
            "birthDate": "2001-04-01",
            "gpa": 3.8,
        });
        let request = CredentialRequest::new(SUBJECT_ID.to_owned(), claims);

        let first = dummy_issuer()
            .issue(
                &request,
                &template,
                &StubSigner::default(),
                NOW,
                &mut rand::thread_rng(),
            )
            .unwrap();
        let second = dummy_issuer()
            .issue(
                &request,
                &template,
                &StubSigner::default(),
                NOW,
                &mut rand::thread_rng(),
            )
            .unwrap();

        let salts: HashSet<&str> = first
            .disclosures()
            .iter()
            .chain(second.disclosures())
            .map(Disclosure::salt)
            .collect();
        assert_eq!(salts.len(), 10);
        assert_eq!(first.disclosures()[0].salt().len(), 22);
    }

    #[test]
    fn seeded_rng_makes_issuance_reproducible() {
        assert_eq!(issue_student_credential(), issue_student_credential());
    }

    #[test]
    fn issue_from_claim_source() {
        let source: HashMap<String, JsonObject> = [(
            SUBJECT_ID.to_owned(),
            json_object!({
                "fullName": "山田太郎",
                "studentId": "S12345678",
                "department": "工学部",
                "unrelated": true,
            }),
        )]
        .into_iter()
        .collect();

        let issued = dummy_issuer()
            .issue_from_source(
                SUBJECT_ID,
                &source,
                &student_id_template(),
                &StubSigner::default(),
                NOW,
                &mut seeded_rng(),
            )
            .unwrap();

        assert_eq!(issued.disclosures()[0].value(), &json!("山田太郎"));
        assert_eq!(issued.disclosures()[1].value(), &json!("S12345678"));

        let request = CredentialRequest::from_source(
            SUBJECT_ID.to_owned(),
            &source,
            &student_id_template(),
        );
        assert_eq!(request.subject_id(), SUBJECT_ID);
        assert!(!request.claims.contains_key("unrelated"));
    }

    #[test]
    fn assemble_credential_uses_settings_hasher() {
        let sd_jwt = assemble_credential(
            &student_request(),
            &student_id_template(),
            &issuer_settings(),
            &StubSigner::default(),
            NOW,
            &mut seeded_rng(),
        )
        .unwrap();

        assert_eq!(sd_jwt, issue_student_credential());
    }
}

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

//! Parsing of compact SD-JWT credentials into a structured view.

use std::collections::HashSet;

use bherror::{
    traits::{ErrorContext as _, ForeignError as _, PropagateError as _},
    Error,
};
use serde_json::Value;
use tracing::warn;

use crate::{
    error::{FormatError, JwtSegment, Result},
    models::{SD, SD_ALG},
    sd_jwt::SdJwt,
    Disclosure, DisclosureEntry, Hasher, HashingAlgorithm, JsonObject, SecondsSinceEpoch,
};

/// A credential split into its parts and decoded, with the claims of all
/// committed disclosures merged into one view.
///
/// Decoding never verifies the signature; see
/// [`Verifier`](crate::verifier::Verifier) for that.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCredential {
    jwt: String,
    header: JsonObject,
    payload: JsonObject,
    disclosures: Vec<DisclosureEntry>,
    reconstructed_claims: JsonObject,
    signature: String,
}

impl DecodedCredential {
    /// The issuer-signed JWT, exactly as received.
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    /// The `<header>.<payload>` part of the JWT the signature is computed
    /// over.
    pub fn signing_input(&self) -> &str {
        let end = self.jwt.len() - self.signature.len() - 1;
        &self.jwt[..end]
    }

    /// The decoded JOSE header.
    pub fn header(&self) -> &JsonObject {
        &self.header
    }

    /// The decoded payload.
    pub fn payload(&self) -> &JsonObject {
        &self.payload
    }

    /// Every presented disclosure, in presentation order.
    pub fn disclosures(&self) -> &[DisclosureEntry] {
        &self.disclosures
    }

    /// The embedded claims of `vc.credentialSubject` together with the
    /// claims of every committed disclosure.
    pub fn reconstructed_claims(&self) -> &JsonObject {
        &self.reconstructed_claims
    }

    /// The signature segment of the JWT, still `base64url` encoded.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The `iss` claim, if present and a string.
    pub fn issuer(&self) -> Option<&str> {
        self.payload.get("iss").and_then(Value::as_str)
    }

    /// The `iat` claim, if present.
    pub fn issued_at(&self) -> Option<SecondsSinceEpoch> {
        self.payload.get("iat").and_then(Value::as_u64)
    }

    /// The `exp` claim, if present.
    pub fn expires_at(&self) -> Option<SecondsSinceEpoch> {
        self.payload.get("exp").and_then(Value::as_u64)
    }

    /// The `vc.credentialSubject` object of the payload, if present.
    pub fn credential_subject(&self) -> Option<&JsonObject> {
        credential_subject(&self.payload)
    }

    /// Number of disclosures that could not be decoded.
    pub fn invalid_disclosure_count(&self) -> usize {
        self.disclosures
            .iter()
            .filter(|entry| entry.is_invalid())
            .count()
    }

    /// Number of decoded disclosures whose digests are not listed in `_sd`.
    pub fn unreferenced_disclosure_count(&self) -> usize {
        self.disclosures
            .iter()
            .filter(|entry| matches!(entry, DisclosureEntry::Unreferenced(_)))
            .count()
    }

    /// Claim names of the committed disclosures, in presentation order.
    pub fn disclosed_claim_names(&self) -> Vec<&str> {
        self.disclosures
            .iter()
            .filter_map(|entry| match entry {
                DisclosureEntry::Disclosed(disclosure) => Some(disclosure.claim_name()),
                _ => None,
            })
            .collect()
    }
}

/// Parse a credential in compact form.
///
/// A corrupted disclosure does not fail decoding; it is reported as
/// [`DisclosureEntry::Invalid`]. A disclosure the issuer did not commit to
/// is reported as [`DisclosureEntry::Unreferenced`] and its claim is left
/// out of the reconstructed claims.
///
/// # Errors
///
/// * [`FormatError::MalformedSdJwt`] if the input has no `~`.
/// * [`FormatError::MalformedJwt`] if the JWT does not have three segments.
/// * [`FormatError::InvalidEncoding`] if the header or payload is not
///   `base64url` encoded JSON object, the payload names an unknown
///   `_sd_alg`, or its `iat` or `exp` is not a non-negative integer.
pub fn decode_credential(sd_jwt: &str) -> Result<DecodedCredential, FormatError> {
    let sd_jwt: SdJwt = sd_jwt.parse()?;

    decode_sd_jwt(&sd_jwt)
}

pub(crate) fn decode_sd_jwt(sd_jwt: &SdJwt) -> Result<DecodedCredential, FormatError> {
    let parts = sd_jwt.jwt_parts()?;

    let header = decode_segment(parts.header, JwtSegment::Header)?;
    let payload = decode_segment(parts.payload, JwtSegment::Payload)?;

    check_time_claim(&payload, "iat")?;
    check_time_claim(&payload, "exp")?;

    let hasher = fetch_hashing_algorithm(&payload)?.hasher();
    let committed = fetch_digests(&payload)?;

    let disclosures: Vec<DisclosureEntry> = sd_jwt
        .disclosures
        .iter()
        .map(|serialized| classify_disclosure(serialized, &committed, &hasher))
        .collect();

    let reconstructed_claims = reconstruct_claims(&payload, &disclosures);

    Ok(DecodedCredential {
        signature: parts.signature.to_owned(),
        jwt: sd_jwt.jwt.clone(),
        header,
        payload,
        disclosures,
        reconstructed_claims,
    })
}

fn decode_segment(segment: &str, which: JwtSegment) -> Result<JsonObject, FormatError> {
    let bytes = vci_jws_utils::base64_url_decode(segment)
        .with_err(|| FormatError::InvalidEncoding(which))?;

    serde_json::from_slice(&bytes)
        .foreign_err(|| FormatError::InvalidEncoding(which))
        .ctx(|| format!("{which} is not a JSON object"))
}

/// A time claim may be absent, but when present it must be whole seconds
/// since the epoch.
fn check_time_claim(payload: &JsonObject, name: &str) -> Result<(), FormatError> {
    match payload.get(name) {
        Some(value) if value.as_u64().is_none() => {
            Err(Error::root(FormatError::InvalidEncoding(JwtSegment::Payload)))
                .ctx(|| format!("{name} is not a non-negative integer: {value}"))
        }
        _ => Ok(()),
    }
}

fn fetch_hashing_algorithm(payload: &JsonObject) -> Result<HashingAlgorithm, FormatError> {
    match payload.get(SD_ALG) {
        None => Ok(HashingAlgorithm::default()),
        Some(Value::String(name)) => name.parse(),
        Some(_) => Err(Error::root(FormatError::InvalidEncoding(JwtSegment::Payload)))
            .ctx(|| format!("{SD_ALG} is not a string")),
    }
}

fn fetch_digests(payload: &JsonObject) -> Result<HashSet<&str>, FormatError> {
    match payload.get(SD) {
        None => Ok(HashSet::new()),
        Some(Value::Array(digests)) => digests
            .iter()
            .map(|digest| digest.as_str().ok_or_else(invalid_digests))
            .collect(),
        Some(_) => Err(invalid_digests()),
    }
}

fn invalid_digests() -> Error<FormatError> {
    Error::root(FormatError::InvalidEncoding(JwtSegment::Payload))
        .ctx(format!("{SD} is not an array of strings"))
}

fn classify_disclosure(
    serialized: &str,
    committed: &HashSet<&str>,
    hasher: impl Hasher,
) -> DisclosureEntry {
    let disclosure = match Disclosure::try_from(serialized.to_owned()) {
        Ok(disclosure) => disclosure,
        Err(error) => {
            warn!("tolerating undecodable disclosure: {}", error);
            return DisclosureEntry::Invalid {
                serialized: serialized.to_owned(),
            };
        }
    };

    if committed.contains(disclosure.digest(hasher).as_str()) {
        DisclosureEntry::Disclosed(disclosure)
    } else {
        warn!(
            "disclosure of {} is not referenced from {}",
            disclosure.claim_name(),
            SD
        );
        DisclosureEntry::Unreferenced(disclosure)
    }
}

fn credential_subject(payload: &JsonObject) -> Option<&JsonObject> {
    payload
        .get("vc")
        .and_then(|vc| vc.get("credentialSubject"))
        .and_then(Value::as_object)
}

/// Start from the embedded claims and add every committed disclosure
/// without overwriting a name that is already present.
fn reconstruct_claims(payload: &JsonObject, disclosures: &[DisclosureEntry]) -> JsonObject {
    let mut claims = credential_subject(payload).cloned().unwrap_or_default();

    for entry in disclosures {
        let DisclosureEntry::Disclosed(disclosure) = entry else {
            continue;
        };
        if claims.contains_key(disclosure.claim_name()) {
            warn!(
                "disclosed claim {} is already present, keeping the first value",
                disclosure.claim_name()
            );
            continue;
        }
        claims.insert(
            disclosure.claim_name().to_owned(),
            disclosure.value().clone(),
        );
    }

    claims
}

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

//! This module provides the [`Verifier`] of presented credentials.
//!
//! Verification never fails on a well-formed credential; the outcome is
//! reported as a [`VerificationStatus`] next to the decoded credential, so
//! a caller may still display what was presented.

use serde_json::Value;
use tracing::{debug, warn};
use vci_jws_utils::{base64_url_decode, JwkPublic, SignatureVerifier, SigningAlgorithm};

use crate::{
    decoder::DecodedCredential,
    error::{FormatError, Result},
    IssuerJwtHeader, IssuerPublicKeyLookup, SecondsSinceEpoch,
};

/// Outcome of verifying a credential.
///
/// The checks are performed in the order of the variants, and the first
/// failing one is reported.
#[derive(strum_macros::Display, Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Every check passed.
    #[strum(to_string = "Valid")]
    Valid,
    /// No [`SignatureVerifier`] is registered for the `alg` of the header.
    #[strum(to_string = "Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The issuer's key could not be found, or the header does not name one.
    #[strum(to_string = "Unknown issuer key")]
    UnknownKey,
    /// The signature does not verify against the issuer's key.
    #[strum(to_string = "Invalid signature")]
    InvalidSignature,
    /// This many presented disclosures are not committed to in `_sd`.
    #[strum(to_string = "Unreferenced disclosures: {0}")]
    UnreferencedDisclosures(usize),
    /// This many presented disclosures could not be decoded.
    #[strum(to_string = "Invalid disclosures: {0}")]
    InvalidDisclosures(usize),
    /// The credential has expired.
    #[strum(to_string = "Credential expired, current time is {now}, exp is {exp}")]
    Expired {
        /// Time of verification.
        now: SecondsSinceEpoch,
        /// The `exp` claim.
        exp: SecondsSinceEpoch,
    },
    /// The credential was issued in the future.
    #[strum(to_string = "Credential not yet valid, current time is {now}, iat is {iat}")]
    NotYetValid {
        /// Time of verification.
        now: SecondsSinceEpoch,
        /// The `iat` claim.
        iat: SecondsSinceEpoch,
    },
}

/// A decoded credential together with the outcome of its verification.
#[derive(Debug, Clone)]
pub struct VerifiedCredential {
    /// The decoded credential, regardless of the status.
    pub credential: DecodedCredential,
    /// The outcome of the verification.
    pub status: VerificationStatus,
}

impl VerifiedCredential {
    /// Whether every check passed.
    pub fn is_valid(&self) -> bool {
        self.status == VerificationStatus::Valid
    }
}

/// Verifier of credentials signed by issuers known to its
/// [`IssuerPublicKeyLookup`].
pub struct Verifier<L: IssuerPublicKeyLookup> {
    key_lookup: L,
    signature_verifiers: Vec<Box<dyn SignatureVerifier>>,
}

impl<L: IssuerPublicKeyLookup> Verifier<L> {
    /// Create a verifier trusting the keys of `key_lookup`.
    ///
    /// No signing algorithm is supported until a [`SignatureVerifier`] is
    /// registered with [`Verifier::with_signature_verifier`].
    pub fn new(key_lookup: L) -> Self {
        Self {
            key_lookup,
            signature_verifiers: Vec::new(),
        }
    }

    /// Register a [`SignatureVerifier`]. It takes precedence over any
    /// previously registered verifier for the same algorithm.
    pub fn with_signature_verifier(
        mut self,
        signature_verifier: impl SignatureVerifier + 'static,
    ) -> Self {
        self.signature_verifiers
            .insert(0, Box::new(signature_verifier));
        self
    }

    /// Decode the credential in compact form and verify it at time `now`.
    ///
    /// # Errors
    ///
    /// Only malformed input fails, with the same [`FormatError`]s as
    /// [`decode_credential`](crate::decode_credential). Every other problem
    /// is reported in [`VerifiedCredential::status`].
    pub fn verify(
        &self,
        sd_jwt: &str,
        now: SecondsSinceEpoch,
    ) -> Result<VerifiedCredential, FormatError> {
        let credential = crate::decode_credential(sd_jwt)?;
        let status = self.status(&credential, now);

        match &status {
            VerificationStatus::Valid => debug!(
                iss = credential.issuer(),
                "credential verified; {} claims disclosed",
                credential.disclosed_claim_names().len()
            ),
            status => warn!(iss = credential.issuer(), "credential rejected: {status}"),
        }

        Ok(VerifiedCredential { credential, status })
    }

    fn status(&self, credential: &DecodedCredential, now: SecondsSinceEpoch) -> VerificationStatus {
        let alg = credential
            .header()
            .get("alg")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let Some(signature_verifier) = self.signature_verifier(alg) else {
            return VerificationStatus::UnsupportedAlgorithm(alg.to_owned());
        };

        let Some(public_key) = self.public_key(credential, signature_verifier.algorithm()) else {
            return VerificationStatus::UnknownKey;
        };

        if !verify_signature(signature_verifier, credential, &public_key) {
            return VerificationStatus::InvalidSignature;
        }

        match credential.unreferenced_disclosure_count() {
            0 => {}
            count => return VerificationStatus::UnreferencedDisclosures(count),
        }

        match credential.invalid_disclosure_count() {
            0 => {}
            count => return VerificationStatus::InvalidDisclosures(count),
        }

        if let Some(exp) = credential.expires_at() {
            if now >= exp {
                return VerificationStatus::Expired { now, exp };
            }
        }

        if let Some(iat) = credential.issued_at() {
            if iat > now {
                return VerificationStatus::NotYetValid { now, iat };
            }
        }

        VerificationStatus::Valid
    }

    fn signature_verifier(&self, alg: &str) -> Option<&dyn SignatureVerifier> {
        let alg: SigningAlgorithm = alg.parse().ok()?;

        self.signature_verifiers
            .iter()
            .find(|verifier| verifier.algorithm() == alg)
            .map(|verifier| &**verifier)
    }

    /// The key is looked up by `iss` and `kid` only; the rest of the header
    /// is passed along as presented.
    fn public_key(
        &self,
        credential: &DecodedCredential,
        alg: SigningAlgorithm,
    ) -> Option<JwkPublic> {
        let header_field = |name: &str| credential.header().get(name).and_then(Value::as_str);

        let Some(kid) = header_field("kid") else {
            warn!("JWT header has no kid");
            return None;
        };
        let header = IssuerJwtHeader {
            alg,
            typ: header_field("typ").unwrap_or_default().to_owned(),
            kid: kid.to_owned(),
        };

        let iss = credential.issuer().unwrap_or_default();

        match self.key_lookup.lookup(iss, &header) {
            Ok(public_key) => Some(public_key),
            Err(err) => {
                warn!("public key lookup failed: {err}");
                None
            }
        }
    }
}

fn verify_signature(
    signature_verifier: &dyn SignatureVerifier,
    credential: &DecodedCredential,
    public_key: &JwkPublic,
) -> bool {
    let Ok(signature) = base64_url_decode(credential.signature()) else {
        return false;
    };

    match signature_verifier.verify(
        credential.signing_input().as_bytes(),
        &signature,
        public_key,
    ) {
        Ok(valid) => valid,
        Err(err) => {
            warn!("signature verification failed: {err}");
            false
        }
    }
}

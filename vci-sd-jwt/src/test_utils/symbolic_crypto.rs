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

use std::{borrow::Cow, str::FromStr};

use bherror::Error;
use serde::{Deserialize, Serialize};
use vci_jws_utils::{
    base64_url_encode, jwk_kid, BoxError, JwkPublic, SignatureVerifier, Signer, SigningAlgorithm,
    SigningError,
};

use crate::{json_object, JsonObject};

pub(crate) const ISSUER_KID: &str = "university-issuer-1";

pub(crate) struct StubSigner {
    pub(crate) public_jwk: JwkPublic,
}

/// Symbolic signature over the given message with the would-be private key
/// corresponding to the given public key, in lieu of a real signature algorithm.
///
/// Bulky, but tests the important thing: over which message and using which
/// key pair was the signature produced, regardless of the (correctness of
/// the) implementation of the signature algorithm.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct StubSignature<'m, 'k>(Cow<'m, [u8]>, Cow<'k, JwkPublic>);

impl StubSignature<'_, '_> {
    pub(crate) fn verify(&self, message: &[u8], public_key: &JwkPublic) -> bool {
        self == &StubSignature(message.into(), Cow::Borrowed(public_key))
    }
}

impl Signer for StubSigner {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::from_str(self.public_jwk.get("alg").unwrap().as_str().unwrap()).unwrap()
    }

    fn sign(&self, signing_input: &str, key_id: &str) -> Result<String, BoxError> {
        if jwk_kid(&self.public_jwk) != Some(key_id) {
            return Err(Box::new(Error::root(SigningError::UnknownKeyId(
                key_id.to_owned(),
            ))));
        }

        let signature = serde_json::to_string(&StubSignature(
            signing_input.as_bytes().into(),
            Cow::Borrowed(&self.public_jwk),
        ))?;

        Ok(base64_url_encode(signature))
    }
}

impl Default for StubSigner {
    fn default() -> Self {
        Self {
            public_jwk: dummy_public_jwk(),
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct StubVerifier;

impl SignatureVerifier for StubVerifier {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Es256
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &JwkPublic,
    ) -> Result<bool, BoxError> {
        let Ok(symbolic_signature) = serde_json::from_slice::<StubSignature>(signature) else {
            return Ok(false);
        };
        Ok(symbolic_signature.verify(message, public_key))
    }
}

pub(crate) fn dummy_public_jwk() -> JsonObject {
    json_object!({
        "kid": ISSUER_KID,
        "alg": "ES256",
    })
}

pub(crate) fn other_public_jwk() -> JsonObject {
    json_object!({
        "kid": ISSUER_KID,
        "alg": "ES256",
        "x": "some other key",
    })
}

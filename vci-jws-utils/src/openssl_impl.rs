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

use std::result::Result as StdResult;

use bherror::{
    traits::{ErrorContext, ForeignError},
    Error, Result,
};
use openssl::{
    bn::{BigNum, BigNumContext},
    ec::{EcGroup, EcGroupRef, EcKey, EcPointRef},
    ecdsa::EcdsaSig,
    nid::Nid,
    pkey::{Private, Public},
    sha::sha256,
};

use super::{utils, SignatureVerifier, Signer, SigningAlgorithm};
use crate::{
    error::{CryptoError, FormatError, SigningError},
    json_object, BoxError, JwkPublic,
};

type EcPrivate = EcKey<Private>;
type EcPublic = EcKey<Public>;

/// A 32-byte coordinate for the elliptic curve.
pub type Coordinate = [u8; 32];

// X9_62_PRIME256V1 is the ANSI X9.62 name of secp256r1 (NIST P-256).
pub(crate) const ELLIPTIC_CURVE_NID: Nid = Nid::X9_62_PRIME256V1;

const CRV: &str = "P-256";
const ALG: &str = "ES256";
const KTY: &str = "EC";

/// [`Signer`] implementation supporting the `ES256` algorithm (ECDSA using the
/// P-256 curve and the SHA-256 hash function).
///
/// The signer holds a single private key, identified by the `kid` given at
/// construction; requests to sign with any other `kid` are refused.
pub struct Es256Signer {
    private_key: EcPrivate,
    kid: String,
}

/// Returns the affine coordinates of the public key.
fn to_affine_coords(
    point: &EcPointRef,
    group: &EcGroupRef,
) -> Result<(Coordinate, Coordinate), CryptoError> {
    let mut x = BigNum::new().foreign_err(|| CryptoError::CryptoBackend)?;
    let mut y = BigNum::new().foreign_err(|| CryptoError::CryptoBackend)?;
    let mut ctx = BigNumContext::new().foreign_err(|| CryptoError::CryptoBackend)?;
    point
        .affine_coordinates(group, &mut x, &mut y, &mut ctx)
        .foreign_err(|| CryptoError::CryptoBackend)?;

    Ok((padded_coordinate(&x)?, padded_coordinate(&y)?))
}

fn padded_coordinate(value: &BigNum) -> Result<Coordinate, CryptoError> {
    let bytes = value
        .to_vec_padded(32)
        .foreign_err(|| CryptoError::CryptoBackend)?;

    bytes
        .try_into()
        .map_err(|_| Error::root(CryptoError::CryptoBackend))
        .ctx(|| "coordinate is longer than 32 bytes")
}

impl Es256Signer {
    /// Generate a fresh `ES256` key with the given `kid` field when presented as a JWK.
    pub fn generate(kid: String) -> Result<Self, CryptoError> {
        let ec_group = EcGroup::from_curve_name(ELLIPTIC_CURVE_NID)
            .foreign_err(|| CryptoError::CryptoBackend)?;
        let private_key = EcKey::<Private>::generate(ec_group.as_ref())
            .foreign_err(|| CryptoError::KeyGenerationFailed)?;

        Ok(Self { private_key, kid })
    }

    /// Create a `ES256` signer from private key in the PEM format.
    pub fn from_private_key_pem(kid: String, private_key_pem: &[u8]) -> Result<Self, CryptoError> {
        let private_key = EcPrivate::private_key_from_pem(private_key_pem)
            .foreign_err(|| CryptoError::CryptoBackend)?;

        Ok(Self { private_key, kid })
    }

    /// The `kid` of the key held by this signer.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Construct a JWK JSON object for the public counterpart of this key. It
    /// will use the `kid` field set at construction.
    pub fn public_jwk(&self) -> Result<JwkPublic, CryptoError> {
        let (x_bytes, y_bytes) =
            to_affine_coords(self.private_key.public_key(), self.private_key.group())?;

        Ok(ec_public_affine_coords_to_jwk(
            &x_bytes,
            &y_bytes,
            Some(&self.kid),
        ))
    }
}

/// Constructs the JWK from the coordinates of the public ECDSA key using P-256
/// curve.
///
/// **Note**: this function **DOES NOT** check that the coordinates are valid.
pub fn ec_public_affine_coords_to_jwk(
    x_bytes: &Coordinate,
    y_bytes: &Coordinate,
    kid: Option<&str>,
) -> JwkPublic {
    let x = utils::base64_url_encode(x_bytes);
    let y = utils::base64_url_encode(y_bytes);

    let mut jwk = json_object!({
        "kty": KTY,
        "alg": ALG,
        "use": "sig",
        "crv": CRV,
        "x": x,
        "y": y,
    });

    if let Some(kid) = kid {
        jwk.insert("kid".to_owned(), serde_json::Value::String(kid.to_owned()));
    }

    jwk
}

impl Signer for Es256Signer {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Es256
    }

    fn sign(&self, signing_input: &str, key_id: &str) -> StdResult<String, BoxError> {
        if key_id != self.kid {
            return Err(Box::new(Error::root(SigningError::UnknownKeyId(
                key_id.to_owned(),
            ))));
        }

        let digest = sha256(signing_input.as_bytes());
        let signature = EcdsaSig::sign(&digest, self.private_key.as_ref())?;

        // JWS wants the fixed-size `r || s` concatenation rather than DER
        let mut jws = signature.r().to_vec_padded(32)?;
        jws.extend(signature.s().to_vec_padded(32)?);

        Ok(utils::base64_url_encode(jws))
    }
}

/// [`SignatureVerifier`] implementation supporting the `ES256` algorithm (ECDSA
/// using the P-256 curve and the SHA-256 hash function).
#[derive(Debug, Default, Clone, Copy)]
pub struct Es256Verifier;

impl SignatureVerifier for Es256Verifier {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Es256
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &JwkPublic,
    ) -> StdResult<bool, BoxError> {
        let public_key = public_key_from_jwk_es256(public_key)?;
        let Ok(jws_bytes) = <&[u8; 64]>::try_from(signature) else {
            // a signature of the wrong size is simply not a valid signature
            return Ok(false);
        };
        let (r, s) = jws_bytes.split_at(32);
        let r = BigNum::from_slice(r)?;
        let s = BigNum::from_slice(s)?;
        let ecdsa_sig = EcdsaSig::from_private_components(r, s)?;

        let digest = sha256(message);

        Ok(ecdsa_sig.verify(&digest, public_key.as_ref())?)
    }
}

pub(crate) fn public_key_from_jwk_es256(public_key: &JwkPublic) -> Result<EcPublic, FormatError> {
    check_jwk_field(public_key, "kty", KTY)?;
    check_jwk_field(public_key, "crv", CRV)?;

    let x = parse_coord(public_key, "x")?;
    let x = BigNum::from_slice(check_len(&x)?)
        .foreign_err(|| FormatError::JwkParsingFailed("Failed to construct BigNum".to_string()))?;
    let y = parse_coord(public_key, "y")?;
    let y = BigNum::from_slice(check_len(&y)?)
        .foreign_err(|| FormatError::JwkParsingFailed("Failed to construct BigNum".to_string()))?;

    let group = EcGroup::from_curve_name(ELLIPTIC_CURVE_NID)
        .foreign_err(|| FormatError::JwkParsingFailed("unsupported curve".to_string()))?;

    EcPublic::from_public_key_affine_coordinates(group.as_ref(), x.as_ref(), y.as_ref())
        .foreign_err(|| FormatError::JwkParsingFailed("coordinate construction failed".to_string()))
}

fn check_len(coord: &[u8]) -> Result<&[u8; 32], FormatError> {
    <&[u8; 32]>::try_from(coord)
        .foreign_err(|| FormatError::JwkParsingFailed("parsing coord failed".to_string()))
        .ctx(|| format!("coordinate has {} bytes", coord.len()))
}

fn check_jwk_field(
    public_key: &JwkPublic,
    field: &str,
    expected_value: &str,
) -> Result<(), FormatError> {
    let error = |message| Error::root(FormatError::JwkParsingFailed(message));

    let value = public_key
        .get(field)
        .ok_or_else(|| error(format!("missing \"{}\" field", field)))?;

    if value == expected_value {
        return Ok(());
    }

    Err(error(format!("incorrect value on \"{}\" field", field))).ctx(|| {
        format!(
            "value on field \"{}\" was {}, expected {}",
            field, value, expected_value
        )
    })
}

fn parse_coord(public_key: &JwkPublic, coord: &str) -> Result<Vec<u8>, FormatError> {
    let error = |message| Error::root(FormatError::JwkParsingFailed(message));

    let value = public_key
        .get(coord)
        .ok_or_else(|| error(format!("fetching coordinate {} failed", coord)))?;
    let base64_coord = value
        .as_str()
        .ok_or_else(|| error("coord not str".to_string()))
        .ctx(|| format!("coord {} as str failed", coord))?;

    utils::base64_url_decode(base64_coord)
        .map_err(|_| error("decoding coord failed".to_string()))
        .ctx(|| format!("decoding coord {} failed", coord))
}

//! Pseudonyms: a Pedersen-style commitment `pkNym = g^sk * h^skNym` to the
//! credential secret, used as a fresh per-transaction identity, plus a
//! signature proving knowledge of its opening.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::{vec, UniformRand};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use dac_utils::serde_utils::ArkObjectBytes;

use crate::error::DacError;
use crate::hash_to_scalar;
use crate::keys::{PublicKey, SecretKey};
use crate::point::CurvePoint;

/// Proof of knowledge of the pseudonym's secret key and randomness, bound to
/// a message.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct NymSignature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub res_sk: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub res_sk_nym: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub commitment: CurvePoint<E>,
}

/// Generate a fresh pseudonym for the holder of `sk`. `h` is a public
/// parameter; the pseudonym lives in its group.
pub fn generate_nym_keys<E: Pairing, R: RngCore>(
    rng: &mut R,
    sk: &SecretKey<E::ScalarField>,
    h: &CurvePoint<E>,
) -> Result<(SecretKey<E::ScalarField>, PublicKey<E>), DacError> {
    let g = h.generator_same_group();

    let sk_nym = SecretKey::rand(rng);
    let pk_nym = CurvePoint::mul2(&g, &sk.0, h, &sk_nym.0)?;

    Ok((sk_nym, pk_nym))
}

pub fn sign_nym<E: Pairing, R: RngCore>(
    rng: &mut R,
    pk_nym: &PublicKey<E>,
    sk_nym: &SecretKey<E::ScalarField>,
    sk: &SecretKey<E::ScalarField>,
    h: &CurvePoint<E>,
    m: &[u8],
) -> Result<NymSignature<E>, DacError> {
    let g = h.generator_same_group();

    let t1 = E::ScalarField::rand(rng);
    let t2 = E::ScalarField::rand(rng);

    let commitment = CurvePoint::mul2(&g, &t1, h, &t2)?;
    let c = challenge(&commitment, pk_nym, m)?;

    Ok(NymSignature {
        res_sk: sk.0 * c + t1,
        res_sk_nym: sk_nym.0 * c + t2,
        commitment,
    })
}

impl<E: Pairing> NymSignature<E> {
    /// Accept iff `pkNym^c * commitment == g^resSk * h^resSkNym`.
    pub fn verify(
        &self,
        h: &CurvePoint<E>,
        pk_nym: &PublicKey<E>,
        m: &[u8],
    ) -> Result<(), DacError> {
        let g = h.generator_same_group();

        let c = challenge(&self.commitment, pk_nym, m)?;

        let lhs = pk_nym.mul(&c).add(&self.commitment)?;
        let rhs = CurvePoint::mul2(&g, &self.res_sk, h, &self.res_sk_nym)?;

        if lhs != rhs {
            return Err(DacError::VerificationFailed("NymSignature::verify"));
        }
        Ok(())
    }
}

fn challenge<E: Pairing>(
    commitment: &CurvePoint<E>,
    pk_nym: &PublicKey<E>,
    m: &[u8],
) -> Result<E::ScalarField, DacError> {
    let mut bytes = vec![];
    commitment.serialize_compressed(&mut bytes)?;
    pk_nym.serialize_compressed(&mut bytes)?;
    bytes.extend_from_slice(m);
    Ok(hash_to_scalar(&bytes))
}

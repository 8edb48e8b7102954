//! Auditing: ElGamal encryption of the user's public key under a designated
//! auditor's key, plus a proof that the ciphertext honestly encrypts the key
//! behind the transaction's pseudonym. The auditor can always recover the
//! long-term identity; nobody else learns it.

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

/// `enc1 = audPk^r * userPk`, `enc2 = g^r` in the group of `userPk`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct AuditingEncryption<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub enc1: CurvePoint<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub enc2: CurvePoint<E>,
}

/// NIZK that the encryption is honest: it binds knowledge of the user's
/// secret key, the encryption randomness, and the pseudonym randomness in
/// three parallel Schnorr relations under one challenge.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct AuditingProof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub res1: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub res2: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub res3: E::ScalarField,
}

/// Encrypt `user_pk` under `aud_pk`. The randomness is returned so the user
/// can later prove the encryption honest; it is safe to disclose.
pub fn auditing_encrypt<E: Pairing, R: RngCore>(
    rng: &mut R,
    aud_pk: &PublicKey<E>,
    user_pk: &PublicKey<E>,
) -> Result<(AuditingEncryption<E>, E::ScalarField), DacError> {
    let g = user_pk.generator_same_group();

    let r = E::ScalarField::rand(rng);
    let enc1 = aud_pk.mul(&r).add(user_pk)?;
    let enc2 = g.mul(&r);

    Ok((AuditingEncryption { enc1, enc2 }, r))
}

impl<E: Pairing> AuditingEncryption<E> {
    /// `enc2^{-audSk} * enc1` recovers the user's public key.
    pub fn decrypt(
        &self,
        aud_sk: &SecretKey<E::ScalarField>,
    ) -> Result<CurvePoint<E>, DacError> {
        self.enc2.mul(&-aud_sk.0).add(&self.enc1)
    }
}

pub fn auditing_prove<E: Pairing, R: RngCore>(
    rng: &mut R,
    encryption: &AuditingEncryption<E>,
    sk: &SecretKey<E::ScalarField>,
    sk_nym: &SecretKey<E::ScalarField>,
    aud_pk: &PublicKey<E>,
    r: &E::ScalarField,
    h: &CurvePoint<E>,
    pk_nym: &PublicKey<E>,
) -> Result<AuditingProof<E>, DacError> {
    let g = h.generator_same_group();

    let r1 = E::ScalarField::rand(rng);
    let r2 = E::ScalarField::rand(rng);
    let r3 = E::ScalarField::rand(rng);

    let com1 = CurvePoint::mul2(&g, &r1, aud_pk, &r2)?;
    let com2 = g.mul(&r2);
    let com3 = CurvePoint::mul2(&g, &r1, h, &r3)?;

    let c = challenge(&com1, &com2, &com3, encryption, pk_nym)?;

    Ok(AuditingProof {
        c,
        res1: c * sk.0 + r1,
        res2: c * *r + r2,
        res3: c * sk_nym.0 + r3,
    })
}

impl<E: Pairing> AuditingProof<E> {
    pub fn verify(
        &self,
        encryption: &AuditingEncryption<E>,
        pk_nym: &PublicKey<E>,
        aud_pk: &PublicKey<E>,
        h: &CurvePoint<E>,
    ) -> Result<(), DacError> {
        let g = h.generator_same_group();
        let c_neg = -self.c;

        let com1 = CurvePoint::mul2(&g, &self.res1, aud_pk, &self.res2)?
            .add(&encryption.enc1.mul(&c_neg))?;
        let com2 = CurvePoint::mul2(&g, &self.res2, &encryption.enc2, &c_neg)?;
        let com3 =
            CurvePoint::mul2(&g, &self.res1, h, &self.res3)?.add(&pk_nym.mul(&c_neg))?;

        let c_prime = challenge(&com1, &com2, &com3, encryption, pk_nym)?;

        if c_prime != self.c {
            return Err(DacError::VerificationFailed("AuditingProof::verify"));
        }
        Ok(())
    }
}

fn challenge<E: Pairing>(
    com1: &CurvePoint<E>,
    com2: &CurvePoint<E>,
    com3: &CurvePoint<E>,
    encryption: &AuditingEncryption<E>,
    pk_nym: &PublicKey<E>,
) -> Result<E::ScalarField, DacError> {
    let mut bytes = vec![];
    com1.serialize_compressed(&mut bytes)?;
    com2.serialize_compressed(&mut bytes)?;
    com3.serialize_compressed(&mut bytes)?;
    encryption.enc1.serialize_compressed(&mut bytes)?;
    encryption.enc2.serialize_compressed(&mut bytes)?;
    pk_nym.serialize_compressed(&mut bytes)?;
    Ok(hash_to_scalar(&bytes))
}

//! Schnorr signatures over either source group, in the short
//! challenge-response form: the signature carries `(s, e)` and the verifier
//! recomputes the challenge from the reconstructed commitment.

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

pub struct Schnorr<E: Pairing> {
    g: CurvePoint<E>,
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SchnorrSignature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub s: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub e: E::ScalarField,
}

impl<E: Pairing> Schnorr<E> {
    pub fn new(first: bool) -> Self {
        Self {
            g: CurvePoint::generator(first),
        }
    }

    pub fn generate_keys<R: RngCore>(
        &self,
        rng: &mut R,
    ) -> (SecretKey<E::ScalarField>, PublicKey<E>) {
        let sk = SecretKey::rand(rng);
        let pk = self.g.mul(&sk.0);
        (sk, pk)
    }

    pub fn sign<R: RngCore>(
        &self,
        rng: &mut R,
        sk: &SecretKey<E::ScalarField>,
        m: &[u8],
    ) -> Result<SchnorrSignature<E>, DacError> {
        let k = E::ScalarField::rand(rng);
        let r = self.g.mul(&k);
        let e = Self::challenge(&r, m)?;
        let s = k + sk.0 * e;
        Ok(SchnorrSignature { s, e })
    }

    /// Reconstruct `r' = g^s * pk^{-e}` and accept iff the recomputed
    /// challenge matches.
    pub fn verify(
        &self,
        pk: &PublicKey<E>,
        signature: &SchnorrSignature<E>,
        m: &[u8],
    ) -> Result<(), DacError> {
        let r = CurvePoint::mul2(&self.g, &signature.s, &pk.neg(), &signature.e)?;
        let e = Self::challenge(&r, m)?;
        if e != signature.e {
            return Err(DacError::VerificationFailed("Schnorr::verify"));
        }
        Ok(())
    }

    fn challenge(r: &CurvePoint<E>, m: &[u8]) -> Result<E::ScalarField, DacError> {
        let mut bytes = vec![];
        r.serialize_compressed(&mut bytes)?;
        bytes.extend_from_slice(m);
        Ok(hash_to_scalar(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use dac_utils::test_serialization;

    #[test]
    fn sign_and_verify() {
        for first in [true, false] {
            let mut rng = StdRng::seed_from_u64(0u64);
            let schnorr = Schnorr::<Bn254>::new(first);
            let (sk, pk) = schnorr.generate_keys(&mut rng);

            let signature = schnorr.sign(&mut rng, &sk, b"Message").unwrap();
            schnorr.verify(&pk, &signature, b"Message").unwrap();

            test_serialization!(SchnorrSignature<Bn254>, signature);
        }
    }

    #[test]
    fn wrong_message_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let schnorr = Schnorr::<Bn254>::new(true);
        let (sk, pk) = schnorr.generate_keys(&mut rng);

        let signature = schnorr.sign(&mut rng, &sk, b"Message").unwrap();
        let err = schnorr.verify(&pk, &signature, b"Tampered").unwrap_err();
        assert!(err.to_string().contains("verification"));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let schnorr = Schnorr::<Bn254>::new(false);
        let (sk, pk) = schnorr.generate_keys(&mut rng);

        let signature = schnorr.sign(&mut rng, &sk, b"Message").unwrap();

        let mut wrong_s = signature.clone();
        wrong_s.s = wrong_s.s * Fr::from(0x13u64);
        assert!(schnorr
            .verify(&pk, &wrong_s, b"Message")
            .unwrap_err()
            .to_string()
            .contains("verification"));

        let mut wrong_e = signature;
        wrong_e.e = wrong_e.e * Fr::from(0x13u64);
        assert!(schnorr
            .verify(&pk, &wrong_e, b"Message")
            .unwrap_err()
            .to_string()
            .contains("verification"));
    }

    #[test]
    fn deterministic_signing() {
        let schnorr = Schnorr::<Bn254>::new(true);
        let (sk, _) = schnorr.generate_keys(&mut StdRng::seed_from_u64(3u64));
        let one = schnorr
            .sign(&mut StdRng::seed_from_u64(4u64), &sk, b"Message")
            .unwrap();
        let two = schnorr
            .sign(&mut StdRng::seed_from_u64(4u64), &sk, b"Message")
            .unwrap();
        assert_eq!(one, two);
    }
}

//! A level's signing context: Groth signatures live at the level's own
//! parity while Schnorr signatures use the opposite group, matching how the
//! public key alternates between G1 and G2 along a delegation chain.

use ark_ec::pairing::Pairing;
use ark_std::rand::RngCore;
use ark_std::vec::Vec;

use crate::error::DacError;
use crate::groth::{Groth, GrothSignature};
use crate::keys::{PublicKey, SecretKey};
use crate::point::CurvePoint;
use crate::schnorr::{Schnorr, SchnorrSignature};

pub struct Siblings<E: Pairing> {
    groth: Groth<E>,
    schnorr: Schnorr<E>,
}

impl<E: Pairing> Siblings<E> {
    /// `groth_ys` must have been generated at the parity `first`.
    pub fn new(first: bool, groth_ys: Vec<CurvePoint<E>>) -> Self {
        Self {
            groth: Groth::new(first, groth_ys),
            schnorr: Schnorr::new(!first),
        }
    }

    pub fn generate_keys<R: RngCore>(
        &self,
        rng: &mut R,
    ) -> (SecretKey<E::ScalarField>, PublicKey<E>) {
        self.groth.generate_keys(rng)
    }

    pub fn sign_groth<R: RngCore>(
        &self,
        rng: &mut R,
        sk: &SecretKey<E::ScalarField>,
        m: &[CurvePoint<E>],
    ) -> Result<GrothSignature<E>, DacError> {
        self.groth.sign(rng, sk, m)
    }

    pub fn sign_schnorr<R: RngCore>(
        &self,
        rng: &mut R,
        sk: &SecretKey<E::ScalarField>,
        m: &[u8],
    ) -> Result<SchnorrSignature<E>, DacError> {
        self.schnorr.sign(rng, sk, m)
    }

    pub fn verify_groth(
        &self,
        pk: &PublicKey<E>,
        sigma: &GrothSignature<E>,
        m: &[CurvePoint<E>],
    ) -> Result<(), DacError> {
        self.groth.verify(pk, sigma, m)
    }

    pub fn verify_schnorr(
        &self,
        pk: &PublicKey<E>,
        sigma: &SchnorrSignature<E>,
        m: &[u8],
    ) -> Result<(), DacError> {
        self.schnorr.verify(pk, sigma, m)
    }

    pub fn randomize_groth<R: RngCore>(
        &self,
        rng: &mut R,
        sigma: &GrothSignature<E>,
        r_prime: Option<E::ScalarField>,
    ) -> Result<GrothSignature<E>, DacError> {
        self.groth.randomize(rng, sigma, r_prime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groth::generate_ys;
    use crate::keys::verify_key_pair;
    use ark_bn254::{Bn254, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ark_std::UniformRand;

    #[test]
    fn both_signature_kinds_work_at_both_parities() {
        for first in [true, false] {
            let mut rng = StdRng::seed_from_u64(0u64);
            let ys = generate_ys::<Bn254, _>(first, 3, &mut rng);
            let siblings = Siblings::new(first, ys);
            let (sk, pk) = siblings.generate_keys(&mut rng);

            assert!(verify_key_pair(&sk, &pk));

            let m = vec![
                CurvePoint::<Bn254>::generator(first).mul(&Fr::rand(&mut rng)),
                CurvePoint::<Bn254>::generator(first).mul(&Fr::rand(&mut rng)),
            ];
            let groth_sig = siblings.sign_groth(&mut rng, &sk, &m).unwrap();
            siblings.verify_groth(&pk, &groth_sig, &m).unwrap();

            let randomized = siblings.randomize_groth(&mut rng, &groth_sig, None).unwrap();
            siblings.verify_groth(&pk, &randomized, &m).unwrap();

            // Schnorr signs at the opposite parity, with its own key pair
            let schnorr = Schnorr::<Bn254>::new(!first);
            let (schnorr_sk, schnorr_pk) = schnorr.generate_keys(&mut rng);
            let schnorr_sig = siblings.sign_schnorr(&mut rng, &schnorr_sk, b"Message").unwrap();
            siblings
                .verify_schnorr(&schnorr_pk, &schnorr_sig, b"Message")
                .unwrap();
        }
    }
}

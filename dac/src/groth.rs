//! Groth structure-preserving signatures over messages that are themselves
//! group elements. Signatures admit randomization: a randomized signature
//! verifies for the original message but is unlinkable to the issued one,
//! which is what the credential chain proof relies on.

use ark_ec::pairing::Pairing;
use ark_ff::{Field, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::{cfg_into_iter, vec::Vec, UniformRand};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use dac_utils::expect_equality;
use dac_utils::serde_utils::ArkObjectBytes;

use crate::error::DacError;
use crate::keys::{PublicKey, SecretKey};
use crate::pairing_product::{eval_pairing_product, PairingTerm};
use crate::point::CurvePoint;

/// Signing context bound to a level parity: `g_same` generates the group of
/// the messages and of the S/T components, `g_other` the group of R and the
/// public key. The y-values are shared public parameters in the `g_same`
/// group.
pub struct Groth<E: Pairing> {
    g_same: CurvePoint<E>,
    g_other: CurvePoint<E>,
    y: Vec<CurvePoint<E>>,
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct GrothSignature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub r: CurvePoint<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub s: CurvePoint<E>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub ts: Vec<CurvePoint<E>>,
}

impl<E: Pairing> Groth<E> {
    pub fn new(first: bool, ys: Vec<CurvePoint<E>>) -> Self {
        let (g_same, g_other) = CurvePoint::generators(first);
        Self {
            g_same,
            g_other,
            y: ys,
        }
    }

    pub fn generate_keys<R: RngCore>(
        &self,
        rng: &mut R,
    ) -> (SecretKey<E::ScalarField>, PublicKey<E>) {
        let sk = SecretKey::rand(rng);
        let pk = self.g_other.mul(&sk.0);
        (sk, pk)
    }

    /// `R = g_other^r`, `S = (y_0 * g_same^sk)^{1/r}`,
    /// `T_j = (y_j^sk * m_j)^{1/r}`.
    pub fn sign<R: RngCore>(
        &self,
        rng: &mut R,
        sk: &SecretKey<E::ScalarField>,
        m: &[CurvePoint<E>],
    ) -> Result<GrothSignature<E>, DacError> {
        self.consistency_check(m.len())?;
        let y0 = self.y.first().ok_or(DacError::IndexOutOfRange(0, 0))?;

        let mut r_rand = E::ScalarField::rand(rng);
        while r_rand.is_zero() {
            r_rand = E::ScalarField::rand(rng);
        }
        let r_inv = r_rand.inverse().unwrap();

        let r = self.g_other.mul(&r_rand);
        let s = y0.add(&self.g_same.mul(&sk.0))?.mul(&r_inv);
        let ts = m
            .iter()
            .enumerate()
            .map(|(index, m_i)| {
                self.y[index]
                    .mul(&sk.0)
                    .add(m_i)
                    .map(|t| t.mul(&r_inv))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GrothSignature { r, s, ts })
    }

    /// Check the n+1 pairing equations
    /// `e(R, S) == e(y_0, g_other) * e(pk, g_same)` and
    /// `e(R, T_j) == e(y_j, pk) * e(m_j, g_other)`, in parallel. The returned
    /// error identifies the first equation that failed.
    pub fn verify(
        &self,
        pk: &PublicKey<E>,
        signature: &GrothSignature<E>,
        m: &[CurvePoint<E>],
    ) -> Result<(), DacError> {
        self.consistency_check(m.len())?;
        self.consistency_check(signature.ts.len())?;
        expect_equality!(
            m.len(),
            signature.ts.len(),
            DacError::UnequalSizeOfSequence
        );
        let y0 = self.y.first().ok_or(DacError::IndexOutOfRange(0, 0))?;

        let checks = cfg_into_iter!(0..=m.len())
            .map(|equation| {
                let product = if equation == 0 {
                    eval_pairing_product(
                        &[
                            PairingTerm::new(signature.r, signature.s, None),
                            PairingTerm::new(y0.neg(), self.g_other, None),
                            PairingTerm::new(pk.neg(), self.g_same, None),
                        ],
                        true,
                    )?
                } else {
                    let index = equation - 1;
                    eval_pairing_product(
                        &[
                            PairingTerm::new(signature.r, signature.ts[index], None),
                            PairingTerm::new(self.y[index].neg(), *pk, None),
                            PairingTerm::new(m[index].neg(), self.g_other, None),
                        ],
                        true,
                    )?
                };
                if !product.is_zero() {
                    return Err(if equation == 0 {
                        DacError::FirstPredicateFailed
                    } else {
                        DacError::MessagePredicateFailed(equation - 1)
                    });
                }
                Ok(())
            })
            .collect::<Vec<Result<(), DacError>>>();

        for check in checks {
            check?;
        }
        Ok(())
    }

    /// Multiply R by `r'` and S, T_j by its inverse. `None` draws the
    /// randomizer from the supplied RNG.
    pub fn randomize<R: RngCore>(
        &self,
        rng: &mut R,
        signature: &GrothSignature<E>,
        r_prime: Option<E::ScalarField>,
    ) -> Result<GrothSignature<E>, DacError> {
        self.consistency_check(signature.ts.len())?;

        let r_prime = match r_prime {
            Some(r) => r,
            None => E::ScalarField::rand(rng),
        };
        let r_prime_inv = r_prime.inverse().unwrap();

        Ok(GrothSignature {
            r: signature.r.mul(&r_prime),
            s: signature.s.mul(&r_prime_inv),
            ts: signature.ts.iter().map(|t| t.mul(&r_prime_inv)).collect(),
        })
    }

    fn consistency_check(&self, len: usize) -> Result<(), DacError> {
        if len > self.y.len() {
            return Err(DacError::MessageCountIncompatibleWithKey(len, self.y.len()));
        }
        Ok(())
    }
}

/// Generate `n` y-values in the message group of the given parity.
pub fn generate_ys<E: Pairing, R: RngCore>(
    first: bool,
    n: usize,
    rng: &mut R,
) -> Vec<CurvePoint<E>> {
    let g = CurvePoint::<E>::generator(first);
    (0..n).map(|_| g.mul(&E::ScalarField::rand(rng))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use dac_utils::test_serialization;

    fn setup(
        first: bool,
        n: usize,
        seed: u64,
    ) -> (
        Groth<Bn254>,
        SecretKey<Fr>,
        PublicKey<Bn254>,
        Vec<CurvePoint<Bn254>>,
        StdRng,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let ys = generate_ys::<Bn254, _>(first, n + 1, &mut rng);
        let groth = Groth::new(first, ys);
        let (sk, pk) = groth.generate_keys(&mut rng);
        let m = (0..n)
            .map(|_| CurvePoint::<Bn254>::generator(first).mul(&Fr::rand(&mut rng)))
            .collect();
        (groth, sk, pk, m, rng)
    }

    #[test]
    fn sign_and_verify() {
        for first in [true, false] {
            let (groth, sk, pk, m, mut rng) = setup(first, 3, 0);
            let signature = groth.sign(&mut rng, &sk, &m).unwrap();
            groth.verify(&pk, &signature, &m).unwrap();

            test_serialization!(GrothSignature<Bn254>, signature);
        }
    }

    #[test]
    fn wrong_message_is_rejected() {
        let (groth, sk, pk, mut m, mut rng) = setup(true, 3, 1);
        let signature = groth.sign(&mut rng, &sk, &m).unwrap();

        m[1] = m[1].mul(&Fr::from(0x13u64));
        let err = groth.verify(&pk, &signature, &m).unwrap_err();
        assert!(err.to_string().contains("1-th message"));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let (groth, sk, pk, m, mut rng) = setup(false, 2, 2);
        let mut signature = groth.sign(&mut rng, &sk, &m).unwrap();
        signature.s = signature.s.mul(&Fr::from(0x13u64));
        let err = groth.verify(&pk, &signature, &m).unwrap_err();
        assert!(err.to_string().contains("first predicate"));
    }

    #[test]
    fn randomized_signature_still_verifies() {
        let (groth, sk, pk, m, mut rng) = setup(true, 2, 3);
        let signature = groth.sign(&mut rng, &sk, &m).unwrap();

        let randomized = groth.randomize(&mut rng, &signature, None).unwrap();
        groth.verify(&pk, &randomized, &m).unwrap();
        assert_ne!(randomized.r, signature.r);
        assert_ne!(randomized.s, signature.s);
        for (a, b) in randomized.ts.iter().zip(signature.ts.iter()) {
            assert_ne!(a, b);
        }

        // two independent randomizations differ from each other as well
        let again = groth.randomize(&mut rng, &signature, None).unwrap();
        assert_ne!(again.r, randomized.r);
    }

    #[test]
    fn randomize_with_fixed_scalar_is_deterministic() {
        let (groth, sk, pk, m, mut rng) = setup(false, 2, 4);
        let signature = groth.sign(&mut rng, &sk, &m).unwrap();
        let r_prime = Fr::rand(&mut rng);
        let one = groth.randomize(&mut rng, &signature, Some(r_prime)).unwrap();
        let two = groth.randomize(&mut rng, &signature, Some(r_prime)).unwrap();
        assert_eq!(one, two);
        groth.verify(&pk, &one, &m).unwrap();
    }

    #[test]
    fn too_many_messages_are_rejected() {
        let (groth, sk, _, _, mut rng) = setup(true, 2, 5);
        let too_long: Vec<_> = (0..4)
            .map(|k| CurvePoint::<Bn254>::generator(true).mul(&Fr::from(k as u64 + 1)))
            .collect();
        let err = groth.sign(&mut rng, &sk, &too_long).unwrap_err();
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn deterministic_key_generation() {
        let (groth, _, _, _, _) = setup(true, 1, 6);
        let (sk1, pk1) = groth.generate_keys(&mut StdRng::seed_from_u64(42));
        let (sk2, pk2) = groth.generate_keys(&mut StdRng::seed_from_u64(42));
        let (sk3, pk3) = groth.generate_keys(&mut StdRng::seed_from_u64(43));
        assert_eq!(sk1, sk2);
        assert_eq!(pk1, pk2);
        assert_ne!(sk1, sk3);
        assert_ne!(pk1, pk3);
    }
}

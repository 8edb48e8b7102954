use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::UniformRand;
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

use dac_utils::hashing_utils::field_elem_from_seed;
use dac_utils::serde_utils::ArkObjectBytes;

use crate::point::CurvePoint;

/// Secret key of any principal in the scheme, a scalar that never leaves its
/// owner.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct SecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

impl<F: PrimeField> SecretKey<F> {
    pub fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self(F::rand(rng))
    }

    /// Derive the key from seed material instead of an RNG, for principals
    /// that keep only a seed at rest.
    pub fn generate_using_seed<D: Digest>(seed: &[u8]) -> Self {
        Self(field_elem_from_seed::<F, D>(seed, b"DAC-KEYGEN-SALT"))
    }
}

/// Public keys are points whose source group depends on the owner's level.
pub type PublicKey<E> = CurvePoint<E>;

/// Check that `pk` is the generator of its own group raised to `sk`.
pub fn verify_key_pair<E: Pairing>(sk: &SecretKey<E::ScalarField>, pk: &PublicKey<E>) -> bool {
    pk.generator_same_group().mul(&sk.0) == *pk
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn seeded_generation_is_deterministic() {
        let one = SecretKey::<Fr>::generate_using_seed::<sha3::Sha3_256>(b"seed material");
        let two = SecretKey::<Fr>::generate_using_seed::<sha3::Sha3_256>(b"seed material");
        let other = SecretKey::<Fr>::generate_using_seed::<sha3::Sha3_256>(b"other seed");
        assert_eq!(one, two);
        assert_ne!(one, other);
    }

    #[test]
    fn key_pair_check() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for first in [true, false] {
            let sk = SecretKey::<Fr>::rand(&mut rng);
            let pk = CurvePoint::<Bn254>::generator(first).mul(&sk.0);
            assert!(verify_key_pair(&sk, &pk));

            let other = SecretKey::<Fr>::rand(&mut rng);
            assert!(!verify_key_pair(&other, &pk));
        }
    }
}

//! Epoch-based revocation. The revocation authority holds a Groth key pair
//! over two y-values; per epoch it signs `(userPk, g2^epoch)` and the user
//! proves possession of such a signature for the current epoch without
//! revealing it, bound to the transaction's pseudonym. The authority's public
//! key lives in G1 and the user key that gets signed lives in G2; the
//! pseudonym base `h` may live in either group.

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::{vec, UniformRand};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use dac_utils::serde_utils::ArkObjectBytes;

use crate::error::DacError;
use crate::groth::{Groth, GrothSignature};
use crate::hash_to_scalar;
use crate::keys::{PublicKey, SecretKey};
use crate::point::CurvePoint;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct RevocationProof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub res1: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub res2: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub res3: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub res4: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub r_prime: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_prime: E::G2Affine,
}

/// The revocation authority's per-epoch signature over the user's public key
/// (a G2 point) and the epoch. `ys` are the authority's two G2 y-values.
pub fn sign_non_revoke<E: Pairing, R: RngCore>(
    rng: &mut R,
    sk: &SecretKey<E::ScalarField>,
    user_pk: &PublicKey<E>,
    epoch: &E::ScalarField,
    ys: &[CurvePoint<E>],
) -> Result<GrothSignature<E>, DacError> {
    let groth = Groth::new(false, ys.to_vec());
    let epoch_point = CurvePoint::<E>::generator(false).mul(epoch);
    groth.sign(rng, sk, &[*user_pk, epoch_point])
}

pub fn revocation_prove<E: Pairing, R: RngCore>(
    rng: &mut R,
    signature: &GrothSignature<E>,
    sk: &SecretKey<E::ScalarField>,
    sk_nym: &SecretKey<E::ScalarField>,
    epoch: &E::ScalarField,
    h: &CurvePoint<E>,
    ys: &[CurvePoint<E>],
) -> Result<RevocationProof<E>, DacError> {
    let g1 = E::G1Affine::generator();
    let g2 = E::G2Affine::generator();
    let g2_point = CurvePoint::<E>::generator(false);

    let groth = Groth::new(false, ys.to_vec());
    let sigma = groth.randomize(rng, signature, None)?;
    let r_prime = sigma.r.as_g1("randomized signature R")?;
    let s_prime = sigma.s.as_g2("randomized signature S")?;
    if sigma.ts.len() < 2 {
        return Err(DacError::IndexOutOfRange(1, sigma.ts.len()));
    }

    let r1 = E::ScalarField::rand(rng);
    let r2 = E::ScalarField::rand(rng);
    let r3 = E::ScalarField::rand(rng);
    let r4 = E::ScalarField::rand(rng);

    let com1 = E::multi_pairing(
        [r_prime, (-g1.into_group()).into_affine()],
        [(g2 * r1).into_affine(), (g2 * r2).into_affine()],
    );
    let com2 = E::pairing(r_prime, (g2 * r3).into_affine());
    let com3 = CurvePoint::mul2(&h.generator_same_group(), &r2, h, &r4)?;

    let c = challenge::<E>(h, &r_prime, &s_prime, &com1, &com2, &com3, epoch)?;

    let res1 = CurvePoint::mul2(&g2_point, &r1, &sigma.ts[0], &c)?.as_g2("response 1")?;
    let res3 = CurvePoint::mul2(&g2_point, &r3, &sigma.ts[1], &c)?.as_g2("response 3")?;

    Ok(RevocationProof {
        c,
        res1,
        res2: c * sk.0 + r2,
        res3,
        res4: c * sk_nym.0 + r4,
        r_prime,
        s_prime,
    })
}

impl<E: Pairing> RevocationProof<E> {
    pub fn verify(
        &self,
        pk_nym: &PublicKey<E>,
        epoch: &E::ScalarField,
        h: &CurvePoint<E>,
        pk_rev: &PublicKey<E>,
        ys: &[CurvePoint<E>],
    ) -> Result<(), DacError> {
        let g1 = E::G1Affine::generator();
        let g2 = E::G2Affine::generator();

        let y0 = ys
            .first()
            .ok_or(DacError::IndexOutOfRange(0, ys.len()))?
            .as_g2("revocation y-value")?;
        let y1 = ys
            .get(1)
            .ok_or(DacError::IndexOutOfRange(1, ys.len()))?
            .as_g2("revocation y-value")?;
        let pk_rev = pk_rev.as_g1("revocation authority public key")?;
        let c_neg = -self.c;

        // The randomized signature itself must verify on its key-binding
        // equation before the commitments are worth recomputing.
        let lhs = E::pairing(self.r_prime, self.s_prime);
        let rhs = E::multi_pairing([g1, pk_rev], [y0, g2]);
        if lhs != rhs {
            return Err(DacError::RevocationEarly);
        }

        let com1 = E::multi_pairing(
            [
                self.r_prime,
                (-g1.into_group()).into_affine(),
                (pk_rev * c_neg).into_affine(),
            ],
            [self.res1, (g2 * self.res2).into_affine(), y0],
        );
        let com2 = E::multi_pairing(
            [
                self.r_prime,
                (pk_rev * c_neg).into_affine(),
                (g1 * c_neg).into_affine(),
            ],
            [self.res3, y1, (g2 * *epoch).into_affine()],
        );
        let com3 = CurvePoint::mul2(&h.generator_same_group(), &self.res2, h, &self.res4)?
            .add(&pk_nym.mul(&c_neg))?;

        let c_prime = challenge::<E>(h, &self.r_prime, &self.s_prime, &com1, &com2, &com3, epoch)?;

        if c_prime != self.c {
            return Err(DacError::RevocationLater);
        }
        Ok(())
    }
}

fn challenge<E: Pairing>(
    h: &CurvePoint<E>,
    r_prime: &E::G1Affine,
    s_prime: &E::G2Affine,
    com1: &ark_ec::pairing::PairingOutput<E>,
    com2: &ark_ec::pairing::PairingOutput<E>,
    com3: &CurvePoint<E>,
    epoch: &E::ScalarField,
) -> Result<E::ScalarField, DacError> {
    let mut bytes = vec![];
    h.serialize_compressed(&mut bytes)?;
    r_prime.serialize_compressed(&mut bytes)?;
    s_prime.serialize_compressed(&mut bytes)?;
    com1.serialize_compressed(&mut bytes)?;
    com2.serialize_compressed(&mut bytes)?;
    com3.serialize_compressed(&mut bytes)?;
    epoch.serialize_compressed(&mut bytes)?;
    Ok(hash_to_scalar(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groth::generate_ys;
    use crate::pseudonym::generate_nym_keys;
    use ark_bn254::{Bn254, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use dac_utils::test_serialization;

    struct Setup {
        pk_nym: PublicKey<Bn254>,
        epoch: Fr,
        h: CurvePoint<Bn254>,
        revoke_pk: PublicKey<Bn254>,
        ys: Vec<CurvePoint<Bn254>>,
        proof: RevocationProof<Bn254>,
    }

    fn setup(h_first: bool, seed: u64) -> Setup {
        let mut rng = StdRng::seed_from_u64(seed);
        let h = CurvePoint::<Bn254>::generator(h_first).mul(&Fr::rand(&mut rng));
        let epoch = Fr::from(0x13u64);

        // the signed user key lives in G2
        let user_sk = SecretKey::<Fr>::rand(&mut rng);
        let user_pk = CurvePoint::<Bn254>::generator(false).mul(&user_sk.0);

        let ys = generate_ys::<Bn254, _>(false, 2, &mut rng);
        let groth = Groth::new(false, ys.clone());
        let (revoke_sk, revoke_pk) = groth.generate_keys(&mut rng);

        let signature =
            sign_non_revoke(&mut rng, &revoke_sk, &user_pk, &epoch, &ys).unwrap();
        let epoch_point = CurvePoint::<Bn254>::generator(false).mul(&epoch);
        groth
            .verify(&revoke_pk, &signature, &[user_pk, epoch_point])
            .unwrap();

        let (sk_nym, pk_nym) = generate_nym_keys(&mut rng, &user_sk, &h).unwrap();

        let proof =
            revocation_prove(&mut rng, &signature, &user_sk, &sk_nym, &epoch, &h, &ys).unwrap();

        Setup {
            pk_nym,
            epoch,
            h,
            revoke_pk,
            ys,
            proof,
        }
    }

    #[test]
    fn proof_verifies_for_either_pseudonym_group() {
        for h_first in [true, false] {
            let s = setup(h_first, 0);
            s.proof
                .verify(&s.pk_nym, &s.epoch, &s.h, &s.revoke_pk, &s.ys)
                .unwrap();

            let proof = s.proof;
            test_serialization!(RevocationProof<Bn254>, proof);
        }
    }

    #[test]
    fn tampered_signature_component_fails_early() {
        let mut s = setup(true, 1);
        s.proof.r_prime = (s.proof.r_prime * Fr::from(0x13u64)).into_affine();

        let err = s
            .proof
            .verify(&s.pk_nym, &s.epoch, &s.h, &s.revoke_pk, &s.ys)
            .unwrap_err();
        assert!(err.to_string().contains("early"));
    }

    #[test]
    fn tampered_challenge_fails_later() {
        let mut s = setup(true, 2);
        s.proof.c = Fr::from(0x13u64);

        let err = s
            .proof
            .verify(&s.pk_nym, &s.epoch, &s.h, &s.revoke_pk, &s.ys)
            .unwrap_err();
        assert!(err.to_string().contains("later"));
    }

    #[test]
    fn wrong_epoch_is_rejected() {
        let s = setup(true, 3);
        let err = s
            .proof
            .verify(&s.pk_nym, &(s.epoch + Fr::from(1u64)), &s.h, &s.revoke_pk, &s.ys)
            .unwrap_err();
        assert!(err.to_string().contains("later"));
    }
}

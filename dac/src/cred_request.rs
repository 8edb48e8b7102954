//! Credential request: a prospective delegatee presents its public key to
//! the issuing authority together with a proof of knowledge of the matching
//! secret key, bound to an authority-supplied nonce.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::{vec, vec::Vec, UniformRand};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use dac_utils::serde_utils::ArkObjectBytes;

use crate::error::DacError;
use crate::hash_to_scalar;
use crate::keys::{PublicKey, SecretKey};
use crate::point::CurvePoint;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct CredRequest<E: Pairing> {
    pub nonce: Vec<u8>,
    #[serde_as(as = "ArkObjectBytes")]
    pub pk: PublicKey<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub res_t: CurvePoint<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub res_r: E::ScalarField,
}

impl<E: Pairing> CredRequest<E> {
    /// `level` selects the generator parity and must match the key pair the
    /// request is made for.
    pub fn new<R: RngCore>(
        rng: &mut R,
        sk: &SecretKey<E::ScalarField>,
        nonce: &[u8],
        level: usize,
    ) -> Result<Self, DacError> {
        let g = CurvePoint::<E>::generator(level % 2 == 1);

        let v = E::ScalarField::rand(rng);
        let res_t = g.mul(&v);
        let pk = g.mul(&sk.0);

        let c = Self::challenge(&res_t, &pk, nonce)?;
        let res_r = v + sk.0 * c;

        Ok(Self {
            nonce: nonce.to_vec(),
            pk,
            res_t,
            res_r,
        })
    }

    /// Nonce freshness is the caller's responsibility; this only checks the
    /// proof of knowledge.
    pub fn validate(&self) -> Result<(), DacError> {
        let g = self.res_t.generator_same_group();

        let c = Self::challenge(&self.res_t, &self.pk, &self.nonce)?;
        let t = CurvePoint::mul2(&g, &self.res_r, &self.pk.neg(), &c)?;

        if t != self.res_t {
            return Err(DacError::VerificationFailed("CredRequest::validate"));
        }
        Ok(())
    }

    fn challenge(
        t: &CurvePoint<E>,
        pk: &PublicKey<E>,
        nonce: &[u8],
    ) -> Result<E::ScalarField, DacError> {
        let mut bytes = vec![];
        t.serialize_compressed(&mut bytes)?;
        pk.serialize_compressed(&mut bytes)?;
        bytes.extend_from_slice(nonce);
        Ok(hash_to_scalar(&bytes))
    }
}

//! The credential chain: an append-only sequence of levels where each level
//! carries the delegatee's public key, its attribute points and a Groth
//! signature by the previous level over both. Level 0 holds only the root
//! authority's public key; its signature and attribute slots are unused
//! sentinels.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::io::Write;
use ark_std::rand::RngCore;
use ark_std::{vec, vec::Vec};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use dac_utils::serde_utils::ArkObjectBytes;

use crate::error::DacError;
use crate::groth::GrothSignature;
use crate::keys::{verify_key_pair, PublicKey, SecretKey};
use crate::point::CurvePoint;
use crate::siblings::Siblings;

/// Shared Groth public parameters, one vector per level parity:
/// `ys[0]` lives in G2 (even levels), `ys[1]` in G1 (odd levels).
pub type YValues<E> = [Vec<CurvePoint<E>>; 2];

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Credentials<E: Pairing> {
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    pub signatures: Vec<Option<GrothSignature<E>>>,
    #[serde_as(as = "Vec<Vec<ArkObjectBytes>>")]
    pub attributes: Vec<Vec<CurvePoint<E>>>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub public_keys: Vec<PublicKey<E>>,
}

/// Key pair for a principal at the given chain level; the public key group
/// alternates with the level parity.
pub fn generate_chain_keys<E: Pairing, R: RngCore>(
    rng: &mut R,
    level: usize,
) -> (SecretKey<E::ScalarField>, PublicKey<E>) {
    Siblings::new(level % 2 != 1, Vec::new()).generate_keys(rng)
}

/// Map attribute strings into the group matching the level parity.
pub fn produce_attributes<E: Pairing>(level: usize, inputs: &[&str]) -> Vec<CurvePoint<E>> {
    inputs
        .iter()
        .map(|value| CurvePoint::from_string(value, level % 2 == 1))
        .collect()
}

impl<E: Pairing> Credentials<E> {
    /// Empty credentials holding only the root authority's public key.
    pub fn new(authority_pk: PublicKey<E>) -> Self {
        Self {
            signatures: vec![None],
            attributes: vec![Vec::new()],
            public_keys: vec![authority_pk],
        }
    }

    /// Extend the chain by one level: the holder of `sk` (the current last
    /// level) signs the delegatee's public key and attributes.
    pub fn delegate<R: RngCore>(
        &mut self,
        sk: &SecretKey<E::ScalarField>,
        public_key: PublicKey<E>,
        attributes: Vec<CurvePoint<E>>,
        rng: &mut R,
        ys: &YValues<E>,
    ) -> Result<(), DacError> {
        let level = self.signatures.len();
        let siblings = Siblings::new(level % 2 == 1, ys[level % 2].clone());

        let mut message = Vec::with_capacity(attributes.len() + 1);
        message.push(public_key);
        message.extend_from_slice(&attributes);

        let sigma = siblings.sign_groth(rng, sk, &message)?;

        self.attributes.push(attributes);
        self.signatures.push(Some(sigma));
        self.public_keys.push(public_key);

        Ok(())
    }

    /// Check the validity of the chain itself (not of any NIZK): every level
    /// signature verifies under the previous level's key, the top key is the
    /// given authority key and `sk` opens the bottom one.
    pub fn verify(
        &self,
        sk: &SecretKey<E::ScalarField>,
        authority_pk: &PublicKey<E>,
        ys: &YValues<E>,
    ) -> Result<(), DacError> {
        let levels = self.signatures.len();
        if levels == 0 {
            return Err(DacError::EmptyCredentials);
        }

        let top = self
            .public_keys
            .first()
            .ok_or(DacError::IndexOutOfRange(0, 0))?;
        if authority_pk != top {
            return Err(DacError::RootKeyMismatch);
        }

        for index in (1..levels).rev() {
            let siblings = Siblings::new(index % 2 == 1, ys[index % 2].clone());

            let signature = self.signatures[index]
                .as_ref()
                .ok_or(DacError::IndexOutOfRange(index, levels))?;
            let signer = self
                .public_keys
                .get(index - 1)
                .ok_or(DacError::IndexOutOfRange(index - 1, self.public_keys.len()))?;
            let delegatee = self
                .public_keys
                .get(index)
                .ok_or(DacError::IndexOutOfRange(index, self.public_keys.len()))?;
            let attributes = self
                .attributes
                .get(index)
                .ok_or(DacError::IndexOutOfRange(index, self.attributes.len()))?;

            let mut message = Vec::with_capacity(attributes.len() + 1);
            message.push(*delegatee);
            message.extend_from_slice(attributes);

            siblings
                .verify_groth(signer, signature, &message)
                .map_err(|_| DacError::ChainVerificationFailed(index))?;
        }

        let bottom = self
            .public_keys
            .last()
            .ok_or(DacError::IndexOutOfRange(0, 0))?;
        if !verify_key_pair(sk, bottom) {
            return Err(DacError::SecretKeyMismatch);
        }

        Ok(())
    }
}

/// One disclosed attribute: its level, its position within the level, and
/// its value.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Index<E: Pairing> {
    pub i: usize,
    pub j: usize,
    #[serde_as(as = "ArkObjectBytes")]
    pub attribute: CurvePoint<E>,
}

/// The disclosure set of a proof.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Indices<E: Pairing>(#[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<Index<E>>);

impl<E: Pairing> Default for Indices<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<E: Pairing> Indices<E> {
    pub fn contains(&self, i: usize, j: usize) -> Option<&CurvePoint<E>> {
        self.0
            .iter()
            .find(|entry| entry.i == i && entry.j == j)
            .map(|entry| &entry.attribute)
    }

    /// Canonical transcript form: entries sorted by `(i, j)`, each written
    /// as `i || j || attribute`.
    pub(crate) fn challenge_contribution<W: Write>(&self, mut writer: W) -> Result<(), DacError> {
        let mut entries: Vec<&Index<E>> = self.0.iter().collect();
        entries.sort_by_key(|entry| (entry.i, entry.j));

        for entry in entries {
            (entry.i as u64).serialize_compressed(&mut writer)?;
            (entry.j as u64).serialize_compressed(&mut writer)?;
            entry.attribute.serialize_compressed(&mut writer)?;
        }
        Ok(())
    }
}

//! The credential-chain NIZK. The prover randomizes every level's Groth
//! signature, commits to Schnorr blinders for each signature component,
//! public key and hidden attribute, evaluates all pairing commitments through
//! the shared batch evaluator and derives a single Fiat-Shamir challenge that
//! also binds the pseudonym. The verifier reconstructs every commitment from
//! the responses and accepts iff the recomputed challenge matches.
//!
//! Levels alternate generators: `g_same` spans the level's messages and S/T
//! components, `g_other` the level's R and signer key. The commitment matrix
//! is indexed `[level][slot]` with slots `0..n_i` for attributes, `n_i` for
//! the S equation and `n_i + 1` for the T[0]/child-key equation.

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use ark_std::{vec, vec::Vec, UniformRand};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use dac_utils::serde_utils::ArkObjectBytes;

use crate::config::Config;
use crate::credentials::{Credentials, Indices, YValues};
use crate::error::DacError;
use crate::keys::{PublicKey, SecretKey};
use crate::pairing_product::{PairingProductComputer, PairingTerm};
use crate::hash_to_scalar;
use crate::point::CurvePoint;

/// A NIZK over the whole credential chain. Index 0 of every per-level vector
/// is an unused sentinel kept for on-wire compatibility, as is `res_cpk[L]`
/// whose place is taken by the scalar responses `res_csk` and `res_nym`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Proof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub c: E::ScalarField,
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    pub r_prime: Vec<Option<CurvePoint<E>>>,
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    pub res_s: Vec<Option<CurvePoint<E>>>,
    #[serde_as(as = "Vec<Vec<ArkObjectBytes>>")]
    pub res_t: Vec<Vec<CurvePoint<E>>>,
    #[serde_as(as = "Vec<Vec<Option<ArkObjectBytes>>>")]
    pub res_a: Vec<Vec<Option<CurvePoint<E>>>>,
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    pub res_cpk: Vec<Option<CurvePoint<E>>>,
    #[serde_as(as = "ArkObjectBytes")]
    pub res_csk: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub res_nym: E::ScalarField,
}

fn point_at<'a, E: Pairing>(
    slots: &'a [Option<CurvePoint<E>>],
    index: usize,
) -> Result<&'a CurvePoint<E>, DacError> {
    slots
        .get(index)
        .and_then(Option::as_ref)
        .ok_or(DacError::IndexOutOfRange(index, slots.len()))
}

fn y_at<'a, E: Pairing>(
    ys: &'a [CurvePoint<E>],
    index: usize,
) -> Result<&'a CurvePoint<E>, DacError> {
    ys.get(index)
        .ok_or(DacError::IndexOutOfRange(index, ys.len()))
}

impl<E: Pairing> Credentials<E> {
    /// Produce a NIZK of the chain held by `sk`, disclosing exactly the
    /// attributes in `disclosed` and signing the message `m`. `pk` is the
    /// root authority's key; `h` and `sk_nym` come from pseudonym
    /// generation.
    ///
    /// Both the signature randomizers and the Schnorr blinders are drawn from
    /// `rng`, so a fixed seed reproduces the proof byte for byte.
    #[allow(clippy::too_many_arguments)]
    pub fn prove<R: RngCore>(
        &self,
        rng: &mut R,
        sk: &SecretKey<E::ScalarField>,
        pk: &PublicKey<E>,
        disclosed: &Indices<E>,
        m: &[u8],
        ys: &YValues<E>,
        h: &CurvePoint<E>,
        sk_nym: &SecretKey<E::ScalarField>,
        config: &Config,
    ) -> Result<Proof<E>, DacError> {
        if self.signatures.is_empty() {
            return Err(DacError::IndexOutOfRange(0, 0));
        }
        let levels = self.signatures.len() - 1;

        let mut n = vec![0usize; levels + 1];
        for i in 1..=levels {
            n[i] = self
                .attributes
                .get(i)
                .ok_or(DacError::IndexOutOfRange(i, self.attributes.len()))?
                .len();
        }

        // randomize every level's signature
        let zero = E::ScalarField::ZERO;
        let mut rho_sigma = vec![zero; levels + 1];
        let mut r_prime: Vec<Option<CurvePoint<E>>> = vec![None; levels + 1];
        let mut s_prime: Vec<Option<CurvePoint<E>>> = vec![None; levels + 1];
        let mut t_prime: Vec<Vec<CurvePoint<E>>> = vec![Vec::new(); levels + 1];

        for i in 1..=levels {
            rho_sigma[i] = E::ScalarField::rand(rng);
            let signature = self.signatures[i]
                .as_ref()
                .ok_or(DacError::IndexOutOfRange(i, self.signatures.len()))?;
            if signature.ts.len() < n[i] + 1 {
                return Err(DacError::IndexOutOfRange(n[i], signature.ts.len()));
            }

            r_prime[i] = Some(signature.r.mul(&rho_sigma[i]));
            let rho_sigma_inv = rho_sigma[i].inverse().unwrap();
            s_prime[i] = Some(signature.s.mul(&rho_sigma_inv));
            t_prime[i] = signature.ts[..n[i] + 1]
                .iter()
                .map(|t| t.mul(&rho_sigma_inv))
                .collect();
        }

        // Schnorr blinders
        let mut rho_s = vec![zero; levels + 1];
        let mut rho_t: Vec<Vec<E::ScalarField>> = vec![Vec::new(); levels + 1];
        let mut rho_a: Vec<Vec<E::ScalarField>> = vec![Vec::new(); levels + 1];
        let mut rho_cpk = vec![zero; levels + 1];
        let rho_nym = E::ScalarField::rand(rng);

        for i in 1..=levels {
            rho_s[i] = E::ScalarField::rand(rng);
            rho_cpk[i] = E::ScalarField::rand(rng);

            rho_t[i] = vec![zero; n[i] + 1];
            rho_a[i] = vec![zero; n[i]];
            for j in 0..n[i] {
                rho_t[i][j] = E::ScalarField::rand(rng);
                rho_a[i][j] = E::ScalarField::rand(rng);
            }
            rho_t[i][n[i]] = E::ScalarField::rand(rng);
        }

        let total = (1..=levels).map(|i| n[i] + 2).sum();
        let mut computer = PairingProductComputer::with_capacity(total);

        for i in 1..=levels {
            let first = i % 2 == 1;
            let (g_same, g_other) = CurvePoint::<E>::generators(first);
            let g_same_neg = g_same.neg();
            let g_other_neg = g_other.neg();
            let parity_ys = &ys[i % 2];
            let signature_r = self.signatures[i]
                .as_ref()
                .ok_or(DacError::IndexOutOfRange(i, self.signatures.len()))?
                .r;

            // S equation
            let mut terms = vec![PairingTerm::new(
                g_same,
                signature_r,
                Some(rho_sigma[i] * rho_s[i]),
            )];
            if i != 1 {
                terms.push(PairingTerm::new(g_same_neg, g_other, Some(rho_cpk[i - 1])));
            }
            computer.enqueue(i, n[i], terms);

            // T[0] / child-key equation
            let mut terms = vec![
                PairingTerm::new(g_same, signature_r, Some(rho_sigma[i] * rho_t[i][0])),
                PairingTerm::new(g_same, g_other_neg, Some(rho_cpk[i])),
            ];
            if i != 1 {
                terms.push(PairingTerm::new(
                    y_at(parity_ys, 0)?.neg(),
                    g_other,
                    Some(rho_cpk[i - 1]),
                ));
            }
            computer.enqueue(i, n[i] + 1, terms);

            // one equation per attribute slot; the blinder term is dropped
            // for disclosed attributes
            for j in 0..n[i] {
                let mut terms = vec![PairingTerm::new(
                    g_same,
                    signature_r,
                    Some(rho_sigma[i] * rho_t[i][j + 1]),
                )];
                if i != 1 {
                    terms.push(PairingTerm::new(
                        y_at(parity_ys, j + 1)?.neg(),
                        g_other,
                        Some(rho_cpk[i - 1]),
                    ));
                }
                if disclosed.contains(i, j).is_none() {
                    terms.push(PairingTerm::new(g_same, g_other_neg, Some(rho_a[i][j])));
                }
                computer.enqueue(i, j, terms);
            }
        }

        let coms = computer.compute(config)?;

        let g_h = h.generator_same_group();
        let com_nym = CurvePoint::mul2(&g_h, &rho_cpk[levels], h, &rho_nym)?;

        let c = hash_commitments::<E>(ys, pk, &r_prime, &coms, &com_nym, disclosed, m)?;

        // responses
        let mut res_s: Vec<Option<CurvePoint<E>>> = vec![None; levels + 1];
        let mut res_t: Vec<Vec<CurvePoint<E>>> = vec![Vec::new(); levels + 1];
        let mut res_a: Vec<Vec<Option<CurvePoint<E>>>> = vec![Vec::new(); levels + 1];
        let mut res_cpk: Vec<Option<CurvePoint<E>>> = vec![None; levels + 1];
        let mut res_csk = zero;
        let mut res_nym = zero;

        for i in 1..=levels {
            let g = CurvePoint::<E>::generator(i % 2 == 1);

            res_s[i] = Some(CurvePoint::mul2(&g, &rho_s[i], point_at(&s_prime, i)?, &c)?);
            if i != levels {
                let level_pk = self
                    .public_keys
                    .get(i)
                    .ok_or(DacError::IndexOutOfRange(i, self.public_keys.len()))?;
                res_cpk[i] = Some(CurvePoint::mul2(&g, &rho_cpk[i], level_pk, &c)?);
            } else {
                res_csk = c * sk.0 + rho_cpk[levels];
                res_nym = c * sk_nym.0 + rho_nym;
            }

            res_t[i] = (0..=n[i])
                .map(|j| CurvePoint::mul2(&g, &rho_t[i][j], &t_prime[i][j], &c))
                .collect::<Result<Vec<_>, _>>()?;

            res_a[i] = (0..n[i])
                .map(|j| {
                    if disclosed.contains(i, j).is_none() {
                        CurvePoint::mul2(&g, &rho_a[i][j], &self.attributes[i][j], &c).map(Some)
                    } else {
                        Ok(None)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(Proof {
            c,
            r_prime,
            res_s,
            res_t,
            res_a,
            res_cpk,
            res_csk,
            res_nym,
        })
    }
}

impl<E: Pairing> Proof<E> {
    /// Verify the NIZK against the root authority's key, the shared
    /// parameters, the pseudonym and the disclosure set used at proving
    /// time.
    pub fn verify(
        &self,
        pk: &PublicKey<E>,
        ys: &YValues<E>,
        h: &CurvePoint<E>,
        pk_nym: &PublicKey<E>,
        disclosed: &Indices<E>,
        m: &[u8],
        config: &Config,
    ) -> Result<(), DacError> {
        let levels = self.res_a.len().saturating_sub(1);

        let mut n = vec![0usize; levels + 1];
        let mut total = 0;
        for i in 1..=levels {
            n[i] = self.res_a[i].len();
            total += n[i] + 2;
        }

        let mut computer = PairingProductComputer::with_capacity(total);
        let c_neg = -self.c;

        for i in 1..=levels {
            let first = i % 2 == 1;
            let (g_same, g_other) = CurvePoint::<E>::generators(first);
            let g_same_neg = g_same.neg();
            let g_other_neg = g_other.neg();
            let parity_ys = &ys[i % 2];

            let r_prime = *point_at(&self.r_prime, i)?;
            let res_t = self
                .res_t
                .get(i)
                .ok_or(DacError::IndexOutOfRange(i, self.res_t.len()))?;
            if res_t.len() < n[i] + 1 {
                return Err(DacError::IndexOutOfRange(n[i], res_t.len()));
            }

            // S equation
            let mut terms = vec![PairingTerm::new(*point_at(&self.res_s, i)?, r_prime, None)];
            if i != 1 {
                terms.push(PairingTerm::new(
                    g_same_neg,
                    *point_at(&self.res_cpk, i - 1)?,
                    None,
                ));
            }
            terms.push(PairingTerm::new(*y_at(parity_ys, 0)?, g_other, Some(c_neg)));
            if i == 1 {
                terms.push(PairingTerm::new(g_same, *pk, Some(c_neg)));
            }
            computer.enqueue(i, n[i], terms);

            // T[0] / child-key equation
            let mut terms = vec![PairingTerm::new(res_t[0], r_prime, None)];
            if i != 1 {
                terms.push(PairingTerm::new(
                    y_at(parity_ys, 0)?.neg(),
                    *point_at(&self.res_cpk, i - 1)?,
                    None,
                ));
            }
            if i != levels {
                terms.push(PairingTerm::new(
                    *point_at(&self.res_cpk, i)?,
                    g_other_neg,
                    None,
                ));
            } else {
                terms.push(PairingTerm::new(g_same, g_other_neg, Some(self.res_csk)));
            }
            if i == 1 {
                terms.push(PairingTerm::new(*y_at(parity_ys, 0)?, *pk, Some(c_neg)));
            }
            computer.enqueue(i, n[i] + 1, terms);

            for j in 0..n[i] {
                let mut terms = vec![PairingTerm::new(res_t[j + 1], r_prime, None)];
                if let Some(attribute) = disclosed.contains(i, j) {
                    if i != 1 {
                        terms.push(PairingTerm::new(
                            y_at(parity_ys, j + 1)?.neg(),
                            *point_at(&self.res_cpk, i - 1)?,
                            None,
                        ));
                    }
                    terms.push(PairingTerm::new(*attribute, g_other, Some(c_neg)));
                } else {
                    terms.push(PairingTerm::new(
                        *point_at(&self.res_a[i], j)?,
                        g_other_neg,
                        None,
                    ));
                    if i != 1 {
                        terms.push(PairingTerm::new(
                            y_at(parity_ys, j + 1)?.neg(),
                            *point_at(&self.res_cpk, i - 1)?,
                            None,
                        ));
                    }
                }
                if i == 1 {
                    terms.push(PairingTerm::new(
                        *y_at(parity_ys, j + 1)?,
                        *pk,
                        Some(c_neg),
                    ));
                }
                computer.enqueue(i, j, terms);
            }
        }

        let coms = computer.compute(config)?;

        let g_h = h.generator_same_group();
        let com_nym = CurvePoint::mul2(&g_h, &self.res_csk, h, &self.res_nym)?
            .sub(&pk_nym.mul(&self.c))?;

        let c_prime =
            hash_commitments::<E>(ys, pk, &self.r_prime, &coms, &com_nym, disclosed, m)?;

        if c_prime != self.c {
            return Err(DacError::ProofVerificationFailed);
        }
        Ok(())
    }
}

/// The Fiat-Shamir transcript: y-values, root key, randomized signature
/// components, the commitment matrix in row-major order (absent cells
/// skipped), the pseudonym commitment, the canonicalized disclosure set and
/// the message.
fn hash_commitments<E: Pairing>(
    ys: &YValues<E>,
    pk: &PublicKey<E>,
    r_prime: &[Option<CurvePoint<E>>],
    coms: &[Vec<Option<PairingOutput<E>>>],
    com_nym: &CurvePoint<E>,
    disclosed: &Indices<E>,
    m: &[u8],
) -> Result<E::ScalarField, DacError> {
    let mut bytes = vec![];

    for parity in ys {
        for y in parity {
            y.serialize_compressed(&mut bytes)?;
        }
    }
    pk.serialize_compressed(&mut bytes)?;
    for r in r_prime.iter().flatten() {
        r.serialize_compressed(&mut bytes)?;
    }
    for row in coms {
        for com in row.iter().flatten() {
            com.serialize_compressed(&mut bytes)?;
        }
    }
    com_nym.serialize_compressed(&mut bytes)?;
    disclosed.challenge_contribution(&mut bytes)?;
    bytes.extend_from_slice(m);

    Ok(hash_to_scalar(&bytes))
}

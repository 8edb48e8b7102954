//! # Delegatable anonymous credentials
//!
//! Implementation of the delegatable anonymous credential scheme described in
//! [Practical UC-secure Delegatable Credentials with Attributes and Their Application to Blockchain](https://eprint.iacr.org/2017/1232).
//!
//! A root authority owns a level-0 key pair and issues credentials to
//! intermediate authorities, which can delegate them further down a chain of
//! arbitrary depth. Each delegation level carries a [Groth structure-preserving
//! signature](groth) over the delegatee's public key and a set of attribute
//! points, with the two pairing source groups alternating between levels. The
//! terminal holder can
//!
//! 1. prove possession of the whole chain in zero knowledge while disclosing
//!    an arbitrary subset of attributes ([`credentials::Credentials::prove`]),
//! 2. bind the proof to a fresh unlinkable [pseudonym](pseudonym),
//! 3. encrypt its public key to an [auditor](auditor) along with a proof of
//!    honest encryption, and
//! 4. prove that it has a [non-revocation signature](revocation) for the
//!    current epoch.

pub mod auditor;
pub mod config;
pub mod cred_request;
pub mod credentials;
pub mod error;
pub mod groth;
pub mod keys;
pub mod pairing_product;
pub mod point;
pub mod proof;
pub mod pseudonym;
pub mod revocation;
pub mod schnorr;
pub mod siblings;

use ark_ff::PrimeField;
use dac_utils::hashing_utils::field_elem_from_hash;
use sha3::Sha3_256;

/// The random oracle used throughout the scheme: SHA3-256 of the input,
/// interpreted big-endian and reduced into the scalar field.
pub fn hash_to_scalar<F: PrimeField>(bytes: &[u8]) -> F {
    field_elem_from_hash::<F, Sha3_256>(bytes)
}

//! A tagged union over the two pairing source groups. Credential levels
//! alternate between G1 and G2, so most of the scheme handles "a point in
//! either group"; mixing groups in a single operation is a domain error, not
//! a panic.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::io::{Read, Write};

use crate::error::DacError;
use crate::hash_to_scalar;

#[derive(Debug, PartialEq, Eq)]
pub enum CurvePoint<E: Pairing> {
    G1(E::G1Affine),
    G2(E::G2Affine),
}

impl<E: Pairing> Clone for CurvePoint<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Pairing> Copy for CurvePoint<E> {}

impl<E: Pairing> CurvePoint<E> {
    /// Generator of the group in which `first` levels keep their messages:
    /// G1 on odd levels, G2 on even ones.
    pub fn generator(first: bool) -> Self {
        if first {
            Self::G1(E::G1Affine::generator())
        } else {
            Self::G2(E::G2Affine::generator())
        }
    }

    /// The pair `(g_same, g_other)` of generators for a level: `g_same`
    /// spans the group holding the level's messages and signature components
    /// S and T, `g_other` the group holding R and the signer's public key.
    pub fn generators(first: bool) -> (Self, Self) {
        (Self::generator(first), Self::generator(!first))
    }

    pub fn generator_same_group(&self) -> Self {
        Self::generator(self.is_g1())
    }

    pub fn is_g1(&self) -> bool {
        matches!(self, Self::G1(_))
    }

    /// Map a string to a point by hashing it to a scalar and exponentiating
    /// the group generator.
    pub fn from_string(message: &str, first: bool) -> Self {
        let exp = hash_to_scalar::<E::ScalarField>(message.as_bytes());
        Self::generator(first).mul(&exp)
    }

    pub fn as_g1(&self, context: &'static str) -> Result<E::G1Affine, DacError> {
        match self {
            Self::G1(p) => Ok(*p),
            Self::G2(_) => Err(DacError::WrongGroup(context)),
        }
    }

    pub fn as_g2(&self, context: &'static str) -> Result<E::G2Affine, DacError> {
        match self {
            Self::G2(p) => Ok(*p),
            Self::G1(_) => Err(DacError::WrongGroup(context)),
        }
    }

    pub fn mul(&self, scalar: &E::ScalarField) -> Self {
        match self {
            Self::G1(p) => Self::G1((*p * *scalar).into_affine()),
            Self::G2(p) => Self::G2((*p * *scalar).into_affine()),
        }
    }

    pub fn neg(&self) -> Self {
        match self {
            Self::G1(p) => Self::G1((-p.into_group()).into_affine()),
            Self::G2(p) => Self::G2((-p.into_group()).into_affine()),
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, DacError> {
        match (self, other) {
            (Self::G1(a), Self::G1(b)) => Ok(Self::G1((*a + b.into_group()).into_affine())),
            (Self::G2(a), Self::G2(b)) => Ok(Self::G2((*a + b.into_group()).into_affine())),
            _ => Err(DacError::MismatchedGroups("point addition")),
        }
    }

    pub fn sub(&self, other: &Self) -> Result<Self, DacError> {
        match (self, other) {
            (Self::G1(a), Self::G1(b)) => {
                Ok(Self::G1((a.into_group() - b.into_group()).into_affine()))
            }
            (Self::G2(a), Self::G2(b)) => {
                Ok(Self::G2((a.into_group() - b.into_group()).into_affine()))
            }
            _ => Err(DacError::MismatchedGroups("point subtraction")),
        }
    }

    /// `g * a + h * b`. In G1 this uses the curve's multi-scalar
    /// multiplication; in G2 the two multiplications are combined by
    /// addition.
    pub fn mul2(
        g: &Self,
        a: &E::ScalarField,
        h: &Self,
        b: &E::ScalarField,
    ) -> Result<Self, DacError> {
        match (g, h) {
            (Self::G1(p), Self::G1(q)) => Ok(Self::G1(
                E::G1::msm_unchecked(&[*p, *q], &[*a, *b]).into_affine(),
            )),
            (Self::G2(p), Self::G2(q)) => Ok(Self::G2((*p * *a + *q * *b).into_affine())),
            _ => Err(DacError::MismatchedGroups("product of exponents")),
        }
    }
}

impl<E: Pairing> CanonicalSerialize for CurvePoint<E> {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        match self {
            Self::G1(p) => {
                1u8.serialize_with_mode(&mut writer, compress)?;
                p.serialize_with_mode(writer, compress)
            }
            Self::G2(p) => {
                2u8.serialize_with_mode(&mut writer, compress)?;
                p.serialize_with_mode(writer, compress)
            }
        }
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        1 + match self {
            Self::G1(p) => p.serialized_size(compress),
            Self::G2(p) => p.serialized_size(compress),
        }
    }
}

impl<E: Pairing> Valid for CurvePoint<E> {
    fn check(&self) -> Result<(), SerializationError> {
        match self {
            Self::G1(p) => p.check(),
            Self::G2(p) => p.check(),
        }
    }
}

impl<E: Pairing> CanonicalDeserialize for CurvePoint<E> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        match u8::deserialize_with_mode(&mut reader, compress, validate)? {
            1 => Ok(Self::G1(E::G1Affine::deserialize_with_mode(
                reader, compress, validate,
            )?)),
            2 => Ok(Self::G2(E::G2Affine::deserialize_with_mode(
                reader, compress, validate,
            )?)),
            _ => Err(SerializationError::InvalidData),
        }
    }
}

use ark_ff::PrimeField;
use ark_std::vec::Vec;
use digest::Digest;

/// Hash arbitrary bytes to a field element: the digest is interpreted as a
/// big-endian integer and reduced modulo the field order.
pub fn field_elem_from_hash<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let digest = D::digest(bytes);
    F::from_be_bytes_mod_order(&digest)
}

/// Hash a seed and a salt to a field element, for deterministic key
/// generation from seed material.
pub fn field_elem_from_seed<F: PrimeField, D: Digest>(seed: &[u8], salt: &[u8]) -> F {
    let mut bytes = Vec::with_capacity(seed.len() + salt.len());
    bytes.extend_from_slice(salt);
    bytes.extend_from_slice(seed);
    field_elem_from_hash::<F, D>(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use sha3::Sha3_256;

    #[test]
    fn hash_to_field_is_deterministic() {
        let a = field_elem_from_hash::<Fr, Sha3_256>(b"some input");
        let b = field_elem_from_hash::<Fr, Sha3_256>(b"some input");
        let c = field_elem_from_hash::<Fr, Sha3_256>(b"some other input");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn seeded_field_elem_depends_on_salt() {
        let a = field_elem_from_seed::<Fr, Sha3_256>(b"seed", b"salt-1");
        let b = field_elem_from_seed::<Fr, Sha3_256>(b"seed", b"salt-2");
        assert_ne!(a, b);
    }
}

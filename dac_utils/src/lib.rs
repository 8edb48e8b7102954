pub mod hashing_utils;
pub mod serde_utils;

/// Check that 2 lengths are equal, returning the given error constructor
/// applied to both lengths otherwise.
#[macro_export]
macro_rules! expect_equality {
    ($left: expr, $right: expr, $error: expr) => {
        if $left != $right {
            return Err($error($left, $right));
        }
    };
}

/// Round-trip an object through ark's canonical compressed form, JSON and
/// Message Pack, asserting structural equality after each decode. Meant to be
/// called from test code only.
#[macro_export]
macro_rules! test_serialization {
    ($obj_type:ty, $obj: ident) => {
        let mut serz = vec![];
        ark_serialize::CanonicalSerialize::serialize_compressed(&$obj, &mut serz).unwrap();
        let deserz: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_compressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        // Test JSON serialization with serde
        let obj_ser = serde_json::to_string(&$obj).unwrap();
        let obj_deser = serde_json::from_str::<$obj_type>(&obj_ser).unwrap();
        assert_eq!($obj, obj_deser);

        // Test Message Pack serialization
        let ser = rmp_serde::to_vec_named(&$obj).unwrap();
        let deser = rmp_serde::from_slice::<$obj_type>(&ser).unwrap();
        assert_eq!($obj, deser);
    };
}

use ark_serialize::SerializationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DacError {
    /// An algebra operation received points from different source groups.
    #[error("operands of {0} must lie in the same source group")]
    MismatchedGroups(&'static str),
    /// A point was expected in the other source group.
    #[error("point lies in the wrong source group for {0}")]
    WrongGroup(&'static str),
    #[error("wrong argument length supplied ({0}), must be at most {1}")]
    MessageCountIncompatibleWithKey(usize, usize),
    #[error("sequence lengths do not agree: {0} vs {1}")]
    UnequalSizeOfSequence(usize, usize),
    #[error("index out of range: {0} not below {1}")]
    IndexOutOfRange(usize, usize),
    #[error("empty credentials")]
    EmptyCredentials,
    #[error("trusted authority's public key and credentials' top-level public key do not match")]
    RootKeyMismatch,
    #[error("supplied secret key does not match credentials' bottom-level public key")]
    SecretKeyMismatch,
    #[error("credentials verification failed for level {0}")]
    ChainVerificationFailed(usize),
    #[error("{0}: verification failed")]
    VerificationFailed(&'static str),
    #[error("verification failed for the first predicate")]
    FirstPredicateFailed,
    #[error("verification failed for the {0}-th message")]
    MessagePredicateFailed(usize),
    #[error("proof verification failed")]
    ProofVerificationFailed,
    #[error("verification failed early at e(R', S') == e(g1, y1) * e(pkRev, g2)")]
    RevocationEarly,
    #[error("verification failed later at c' == c")]
    RevocationLater,
    #[error("error occurred in computing coms[{0}][{1}]")]
    PairingEval(usize, usize),
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

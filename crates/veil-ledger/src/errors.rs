//! Error types for the veil ledger.
//!
//! # Error Code Ranges
//!
//! | Range | Category | Description |
//! |-------|----------|-------------|
//! | 0-15 | Ledger | Registration, consumption, configuration |
//! | 100-105 | Groth16 | ZK proof verification failures |
//!
//! Codes are stable: callers that persist or transmit failures can rely on
//! the `u32` value of a variant never being reused for a different meaning.

use light_hasher::errors::HasherError;

/// Ledger operation errors.
///
/// Every failure is terminal for the operation that raised it and leaves no
/// partial state behind. `DuplicateCommitment` and `AlreadySpent` are
/// permanent for the value in question; the remaining variants are safe to
/// retry with corrected inputs.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, num_enum::IntoPrimitive)]
pub enum LedgerError {
    /// The commitment is already a leaf of the accumulator.
    #[error("the commitment has already been submitted")]
    DuplicateCommitment = 0,
    /// The accumulator holds `2^levels` leaves and cannot grow.
    #[error("the merkle tree is full")]
    TreeFull = 1,
    /// The supplied root is not in the root history window.
    #[error("cannot find the merkle root")]
    UnknownRoot = 2,
    /// The nullifier hash is already marked consumed.
    #[error("the nullifier has already been spent")]
    AlreadySpent = 3,
    /// Proof verification rejected the `(root, nullifier, payload)` tuple.
    #[error("invalid membership proof")]
    InvalidProof = 4,
    /// The caller is not allowed to perform this operation.
    #[error("caller is not authorized")]
    Unauthorized = 5,
    /// A 32-byte value is not a canonical encoding of a field element.
    #[error("value is not a canonical field element")]
    InvalidFieldElement = 6,
    /// No leaf has been inserted at the requested index.
    #[error("no leaf at the requested index")]
    LeafOutOfRange = 7,
    /// Construction parameters are out of range (zero depth, zero history).
    #[error("invalid construction parameters")]
    InvalidConfiguration = 8,
    /// The payload effect could not be applied. The nullifier consumed by
    /// the failing operation stays consumed; see the partial-failure policy
    /// on [`crate::Ledger::consume`].
    #[error("payload effect could not be applied")]
    EffectFailed = 9,
}

/// Groth16 ZK proof verification errors.
///
/// These use codes 100-105 and indicate failures while decoding or checking
/// a proof. They are useful for debugging proof generation issues; the
/// ledger itself collapses all of them into [`LedgerError::InvalidProof`].
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, num_enum::IntoPrimitive)]
pub enum Groth16Error {
    /// Proof byte string has the wrong length.
    #[error("proof bytes have the wrong length")]
    InvalidProofLength = 100,
    /// G1 point deserialization or subgroup check failed.
    #[error("invalid G1 point encoding")]
    InvalidG1 = 101,
    /// G2 point deserialization or subgroup check failed.
    #[error("invalid G2 point encoding")]
    InvalidG2 = 102,
    /// Public input count does not match the verifying key.
    #[error("wrong number of public inputs for the verifying key")]
    InvalidPublicInputsLength = 103,
    /// A public input is not reduced below the BN254 scalar field modulus.
    #[error("public input is not below the field modulus")]
    PublicInputGreaterThanFieldSize = 104,
    /// The pairing product equation does not hold.
    #[error("proof verification failed")]
    ProofVerificationFailed = 105,
}

impl From<Groth16Error> for LedgerError {
    fn from(_: Groth16Error) -> Self {
        LedgerError::InvalidProof
    }
}

impl From<HasherError> for LedgerError {
    fn from(_: HasherError) -> Self {
        // The hashers reject inputs that are not canonical field encodings;
        // nothing else about the input is observable here.
        LedgerError::InvalidFieldElement
    }
}

//! Proof verification seam.
//!
//! The ledger only needs a yes/no answer for "does this proof bind these
//! public inputs"; everything cryptographic lives behind [`ProofVerifier`].

use crate::groth16::{verify_groth16, Groth16Proof, Groth16VerifyingKey};

/// Decides whether a proof is valid for a set of public inputs.
///
/// Implementations must be pure: the same inputs always produce the same
/// answer, and a verifier never mutates ledger state.
pub trait ProofVerifier {
    /// Returns true only if `proof` is valid for `public_inputs`.
    fn verify(&self, public_inputs: &[[u8; 32]], proof: &[u8]) -> bool;
}

/// Groth16-backed verifier for membership circuits.
#[derive(Clone, Debug)]
pub struct Groth16MembershipVerifier {
    vk: Groth16VerifyingKey,
}

impl Groth16MembershipVerifier {
    /// Build a verifier around a circuit's verifying key.
    pub fn new(vk: Groth16VerifyingKey) -> Self {
        Self { vk }
    }

    /// The verifying key this verifier checks against.
    pub fn verifying_key(&self) -> &Groth16VerifyingKey {
        &self.vk
    }
}

impl ProofVerifier for Groth16MembershipVerifier {
    fn verify(&self, public_inputs: &[[u8; 32]], proof: &[u8]) -> bool {
        let proof = match Groth16Proof::from_bytes(proof) {
            Ok(proof) => proof,
            Err(err) => {
                tracing::debug!(?err, "rejecting malformed proof bytes");
                return false;
            }
        };
        match verify_groth16(&proof, public_inputs, &self.vk) {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::debug!(?err, "proof verification failed");
                false
            }
        }
    }
}

//! Deployment-defined reveal payloads and their side effects.
//!
//! A consume operation carries a payload whose contents the proof must be
//! bound to (so a relayer cannot swap them in flight) and whose meaning the
//! deployment defines: a withdrawal recipient, a ballot choice. The ledger
//! core never inspects payload contents; it only folds them into the public
//! input vector and hands them to the deployment's effect on success.

use crate::errors::LedgerError;

/// A reveal payload a deployment attaches to consume operations.
pub trait Payload: Clone {
    /// The payload's contribution to the proof's public inputs, in circuit
    /// order. Each element must be a canonical 32-byte big-endian field
    /// element; the verifier rejects anything else.
    fn public_inputs(&self) -> Vec<[u8; 32]>;
}

/// Deployment-side state transition applied after a consume is accepted.
pub trait PayloadEffect<P: Payload> {
    /// Apply the payload's effect.
    ///
    /// By the time this runs the nullifier is already marked spent and stays
    /// spent even if this returns an error; effects that can fail should
    /// validate what they can before the consume is submitted.
    fn apply(&mut self, payload: &P) -> Result<(), LedgerError>;
}

/// Payload for deployments whose consume carries no extra data.
impl Payload for () {
    fn public_inputs(&self) -> Vec<[u8; 32]> {
        Vec::new()
    }
}

/// No-op effect for payload-less deployments.
impl PayloadEffect<()> for () {
    fn apply(&mut self, _payload: &()) -> Result<(), LedgerError> {
        Ok(())
    }
}

//! Reference deployments of the veil commit/reveal ledger.
//!
//! Two deployments exercise the ledger end to end: [`ShieldedVault`], a
//! fixed-denomination mixing pool whose reveals pay a proven recipient, and
//! [`AnonymousBallot`], a permissioned-enrollment ballot whose reveals cast
//! unlinkable votes.

pub mod vote;
pub mod withdraw;

/// Opaque account identifier used for owners, validators, and withdrawal
/// recipients.
pub type AccountId = [u8; 32];

pub use vote::{AnonymousBallot, BallotEvent, TallyEffect, VotePayload};
pub use withdraw::{ShieldedVault, VaultEffect, WithdrawPayload};

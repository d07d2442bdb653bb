//! Shielded value vault.
//!
//! A fixed-denomination mixing pool: every deposit locks exactly
//! `denomination` units against a commitment, every withdrawal proves
//! ownership of *some* deposit and pays the denomination out to a recipient
//! named in the reveal payload. The recipient is a public input, so a
//! relayer carrying the transaction cannot redirect the funds.

use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use light_hasher::Hasher;
use veil_ledger::{Ledger, LedgerError, MerkleWitness, Payload, PayloadEffect, ProofVerifier};

use crate::AccountId;

/// Reveal payload of a withdrawal: who gets the denomination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct WithdrawPayload {
    /// Account credited with the withdrawn denomination.
    pub recipient: AccountId,
}

impl Payload for WithdrawPayload {
    fn public_inputs(&self) -> Vec<[u8; 32]> {
        vec![self.recipient]
    }
}

/// Vault balance book the withdraw effect settles against.
#[derive(Clone, Debug, Default)]
pub struct VaultEffect {
    denomination: u64,
    pool_balance: u64,
    credits: HashMap<AccountId, u64>,
}

impl VaultEffect {
    fn new(denomination: u64) -> Self {
        Self {
            denomination,
            pool_balance: 0,
            credits: HashMap::new(),
        }
    }

    /// Whether the pool can absorb one more deposit without overflowing.
    fn can_fund(&self) -> bool {
        self.pool_balance.checked_add(self.denomination).is_some()
    }

    /// Lock one denomination into the pool. Callers check [`Self::can_fund`]
    /// first; this never fails after that check.
    fn fund(&mut self) {
        self.pool_balance += self.denomination;
    }
}

impl PayloadEffect<WithdrawPayload> for VaultEffect {
    fn apply(&mut self, payload: &WithdrawPayload) -> Result<(), LedgerError> {
        let remaining = self
            .pool_balance
            .checked_sub(self.denomination)
            .ok_or(LedgerError::EffectFailed)?;
        let credit = self.credits.entry(payload.recipient).or_insert(0);
        *credit = credit.checked_add(self.denomination).ok_or(LedgerError::EffectFailed)?;
        self.pool_balance = remaining;
        Ok(())
    }
}

/// A fixed-denomination shielded pool over the commit/reveal ledger.
pub struct ShieldedVault<V, H>
where
    V: ProofVerifier,
    H: Hasher,
{
    ledger: Ledger<WithdrawPayload, VaultEffect, V, H>,
    denomination: u64,
}

impl<V, H> ShieldedVault<V, H>
where
    V: ProofVerifier,
    H: Hasher,
{
    /// Create a vault with a tree of `levels` levels, a recent-root window
    /// of `history_capacity`, and a fixed per-note `denomination`.
    pub fn new(
        levels: usize,
        history_capacity: usize,
        denomination: u64,
        verifier: V,
    ) -> Result<Self, LedgerError> {
        if denomination == 0 {
            return Err(LedgerError::InvalidConfiguration);
        }
        let ledger = Ledger::new(
            levels,
            history_capacity,
            verifier,
            VaultEffect::new(denomination),
        )?;
        Ok(Self {
            ledger,
            denomination,
        })
    }

    /// Deposit one denomination against a note commitment.
    ///
    /// Returns the leaf index the commitment landed at. The balance update
    /// is ordered after the (fallible) registration so a rejected
    /// commitment never moves funds.
    pub fn deposit(&mut self, commitment: [u8; 32]) -> Result<u64, LedgerError> {
        if !self.ledger.effect().can_fund() {
            return Err(LedgerError::EffectFailed);
        }
        let index = self.ledger.register(commitment)?;
        self.ledger.effect_mut().fund();
        tracing::info!(index, denomination = self.denomination, "deposit accepted");
        Ok(index)
    }

    /// Withdraw one denomination to `payload.recipient`, spending
    /// `nullifier_hash` against a membership proof for `root`.
    pub fn withdraw(
        &mut self,
        root: [u8; 32],
        nullifier_hash: [u8; 32],
        proof: &[u8],
        payload: WithdrawPayload,
    ) -> Result<(), LedgerError> {
        self.ledger.consume(root, nullifier_hash, proof, payload)?;
        tracing::info!(
            recipient = %hex::encode(payload.recipient),
            denomination = self.denomination,
            "withdrawal paid out"
        );
        Ok(())
    }

    /// Whether a note's nullifier has been spent.
    pub fn is_spent(&self, nullifier_hash: &[u8; 32]) -> bool {
        self.ledger.is_spent(nullifier_hash)
    }

    /// The fixed per-note denomination.
    pub fn denomination(&self) -> u64 {
        self.denomination
    }

    /// Units currently locked in the pool.
    pub fn pool_balance(&self) -> u64 {
        self.ledger.effect().pool_balance
    }

    /// Units paid out to `recipient` so far.
    pub fn credited(&self, recipient: &AccountId) -> u64 {
        self.ledger.effect().credits.get(recipient).copied().unwrap_or(0)
    }

    /// The accumulator's current root.
    pub fn current_root(&self) -> [u8; 32] {
        self.ledger.current_root()
    }

    /// Whether a root is in the recent-root window.
    pub fn is_known_root(&self, root: &[u8; 32]) -> bool {
        self.ledger.is_known_root(root)
    }

    /// Membership witness for the deposit at `index` against the current
    /// root.
    pub fn path_for(&self, index: u64) -> Result<MerkleWitness, LedgerError> {
        self.ledger.path_for(index)
    }

    /// The underlying ledger, for event draining.
    pub fn ledger_mut(&mut self) -> &mut Ledger<WithdrawPayload, VaultEffect, V, H> {
        &mut self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use light_hasher::Poseidon;
    use veil_ledger::testing::{prove_binding, BindingVerifier};

    const LEVELS: usize = 6;
    const HISTORY: usize = 8;
    const DENOMINATION: u64 = 1_000;

    fn vault() -> ShieldedVault<BindingVerifier<Poseidon>, Poseidon> {
        ShieldedVault::new(LEVELS, HISTORY, DENOMINATION, BindingVerifier::new()).unwrap()
    }

    fn note(tag: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = tag;
        bytes
    }

    fn withdraw_proof(
        root: [u8; 32],
        nullifier_hash: [u8; 32],
        payload: &WithdrawPayload,
    ) -> Vec<u8> {
        prove_binding::<Poseidon>(&[root, nullifier_hash, payload.recipient])
    }

    #[test]
    fn deposit_locks_one_denomination() {
        let mut vault = vault();
        assert_eq!(vault.deposit(note(1)).unwrap(), 0);
        assert_eq!(vault.deposit(note(2)).unwrap(), 1);
        assert_eq!(vault.pool_balance(), 2 * DENOMINATION);
    }

    #[test]
    fn duplicate_deposit_moves_no_funds() {
        let mut vault = vault();
        vault.deposit(note(1)).unwrap();
        assert_eq!(vault.deposit(note(1)), Err(LedgerError::DuplicateCommitment));
        assert_eq!(vault.pool_balance(), DENOMINATION);
    }

    #[test]
    fn withdraw_pays_the_proven_recipient() {
        let mut vault = vault();
        vault.deposit(note(1)).unwrap();
        let root = vault.current_root();
        let nullifier = note(0x41);
        let payload = WithdrawPayload {
            recipient: note(0xaa),
        };
        let proof = withdraw_proof(root, nullifier, &payload);

        vault.withdraw(root, nullifier, &proof, payload).unwrap();
        assert_eq!(vault.pool_balance(), 0);
        assert_eq!(vault.credited(&note(0xaa)), DENOMINATION);
        assert!(vault.is_spent(&nullifier));
    }

    #[test]
    fn relayer_cannot_redirect_the_recipient() {
        let mut vault = vault();
        vault.deposit(note(1)).unwrap();
        let root = vault.current_root();
        let nullifier = note(0x41);
        let proof = withdraw_proof(
            root,
            nullifier,
            &WithdrawPayload {
                recipient: note(0xaa),
            },
        );

        // Same proof submitted with a swapped-in recipient.
        let hijacked = WithdrawPayload {
            recipient: note(0xbb),
        };
        assert_eq!(
            vault.withdraw(root, nullifier, &proof, hijacked),
            Err(LedgerError::InvalidProof)
        );
        assert_eq!(vault.credited(&note(0xbb)), 0);
        assert!(!vault.is_spent(&nullifier));
    }

    #[test]
    fn double_withdraw_is_rejected() {
        let mut vault = vault();
        vault.deposit(note(1)).unwrap();
        vault.deposit(note(2)).unwrap();
        let root = vault.current_root();
        let nullifier = note(0x41);
        let payload = WithdrawPayload {
            recipient: note(0xaa),
        };
        let proof = withdraw_proof(root, nullifier, &payload);

        vault.withdraw(root, nullifier, &proof, payload).unwrap();
        assert_eq!(
            vault.withdraw(root, nullifier, &proof, payload),
            Err(LedgerError::AlreadySpent)
        );
        assert_eq!(vault.credited(&note(0xaa)), DENOMINATION);
    }

    #[test]
    fn zero_denomination_is_rejected() {
        assert!(matches!(
            ShieldedVault::<BindingVerifier<Poseidon>, Poseidon>::new(
                LEVELS,
                HISTORY,
                0,
                BindingVerifier::new()
            ),
            Err(LedgerError::InvalidConfiguration)
        ));
    }
}

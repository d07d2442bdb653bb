//! Bounded history of accumulator roots.
//!
//! A prover fetches the root at proof-generation time; by the time the proof
//! is submitted, further registrations may have advanced the tree. Accepting
//! any of the last `H` roots tolerates that concurrency while bounding how
//! stale an accepted membership claim can be. Older roots are still valid
//! membership evidence (the tree is append-only), so the window is a
//! staleness bound, not a security weakening.

use crate::errors::LedgerError;

/// Default root history capacity, sized the way the original contracts were:
/// one to two orders of magnitude above the expected number of in-flight
/// proofs.
pub const DEFAULT_ROOT_HISTORY_SIZE: usize = 30;

/// Circular buffer of the last `capacity` roots, oldest evicted first.
#[derive(Clone, Debug)]
pub struct RootHistory {
    roots: Vec<[u8; 32]>,
    /// Cursor of the most recently recorded root.
    cursor: usize,
}

impl RootHistory {
    /// Create a history seeded with the current (possibly empty-tree) root,
    /// so that the invariant "the history always contains the current root"
    /// holds from construction onwards.
    pub fn new(capacity: usize, initial_root: [u8; 32]) -> Result<Self, LedgerError> {
        if capacity == 0 {
            return Err(LedgerError::InvalidConfiguration);
        }
        let mut roots = vec![[0u8; 32]; capacity];
        roots[0] = initial_root;
        Ok(Self { roots, cursor: 0 })
    }

    /// Record a new current root, evicting the oldest entry once full.
    pub fn record(&mut self, root: [u8; 32]) {
        self.cursor = (self.cursor + 1) % self.roots.len();
        self.roots[self.cursor] = root;
    }

    /// Whether the root is inside the acceptance window.
    ///
    /// The all-zero value is never a valid root (unwritten buffer slots hold
    /// it) and is always rejected.
    pub fn contains(&self, root: &[u8; 32]) -> bool {
        if *root == [0u8; 32] {
            return false;
        }
        let capacity = self.roots.len();
        // Scan backwards from the most recent entry.
        (0..capacity).any(|offset| {
            let i = (self.cursor + capacity - offset) % capacity;
            self.roots[i] == *root
        })
    }

    /// The most recently recorded root.
    pub fn current(&self) -> [u8; 32] {
        self.roots[self.cursor]
    }

    /// Fixed window size.
    pub fn capacity(&self) -> usize {
        self.roots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn root(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    #[test]
    fn initial_root_is_known() {
        let history = RootHistory::new(4, root(1)).unwrap();
        assert!(history.contains(&root(1)));
        assert_eq!(history.current(), root(1));
    }

    #[test]
    fn zero_root_is_never_known() {
        let history = RootHistory::new(4, root(1)).unwrap();
        assert!(!history.contains(&[0u8; 32]), "unwritten slots must not validate");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            RootHistory::new(0, root(1)).unwrap_err(),
            LedgerError::InvalidConfiguration
        );
    }

    #[test_case(1; "capacity one")]
    #[test_case(4; "capacity four")]
    #[test_case(DEFAULT_ROOT_HISTORY_SIZE; "default capacity")]
    fn eviction_is_fifo(capacity: usize) {
        let mut history = RootHistory::new(capacity, root(1)).unwrap();
        // Fill the window completely past the initial root.
        for i in 0..capacity as u8 {
            history.record(root(10 + i));
        }
        assert!(
            !history.contains(&root(1)),
            "the initial root must be the first evicted"
        );
        for i in 0..capacity as u8 {
            assert!(history.contains(&root(10 + i)), "window entries must stay valid");
        }
        assert_eq!(history.current(), root(10 + capacity as u8 - 1));
    }

    #[test]
    fn current_always_tracks_the_latest_record() {
        let mut history = RootHistory::new(3, root(1)).unwrap();
        for i in 2..=9u8 {
            history.record(root(i));
            assert_eq!(history.current(), root(i));
            assert!(history.contains(&root(i)));
        }
    }
}

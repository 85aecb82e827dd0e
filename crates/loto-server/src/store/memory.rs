//! In-memory `BetStore`, used by tests and by the loopback integration
//! tests in this crate. Grounded on `lockframe-server`'s
//! `storage::memory::MemoryStorage` (`Arc<Mutex<...>>`, `Clone`), upgraded
//! to `tokio::sync::RwLock` so `scan` (readers) and `append` (the single
//! writer) match the read/write lock split `spec.md` §4.G specifies.

use async_trait::async_trait;
use loto_proto::Bet;
use tokio::sync::RwLock;

use loto_core::store::{BetStore, StoreError};

use super::DEFAULT_WINNING_NUMBER;

/// Append-only bet store backed by a `Vec` behind a `tokio::sync::RwLock`.
#[derive(Debug)]
pub struct MemoryStore {
    bets: RwLock<Vec<Bet>>,
    winning_number: u16,
}

impl MemoryStore {
    /// Create an empty store using [`DEFAULT_WINNING_NUMBER`].
    #[must_use]
    pub fn new() -> Self {
        Self { bets: RwLock::new(Vec::new()), winning_number: DEFAULT_WINNING_NUMBER }
    }

    /// Create an empty store with a non-default winning number (tests).
    #[must_use]
    pub fn with_winning_number(winning_number: u16) -> Self {
        Self { bets: RwLock::new(Vec::new()), winning_number }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BetStore for MemoryStore {
    async fn append(&self, bets: Vec<Bet>) -> Result<(), StoreError> {
        let mut guard = self.bets.write().await;
        guard.extend(bets);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Bet>, StoreError> {
        let guard = self.bets.read().await;
        Ok(guard.clone())
    }

    fn is_winner(&self, bet: &Bet) -> bool {
        bet.number == self.winning_number
    }
}

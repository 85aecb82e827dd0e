//! The bet-store adapter contract (`spec.md` §4.C).
//!
//! The core treats persistence as an external collaborator behind this
//! trait; concrete adapters (an in-memory store for tests, a
//! filesystem-backed store for production) live in `loto-server`.

use async_trait::async_trait;
use loto_proto::Bet;
use thiserror::Error;

/// Errors a store adapter may report. `Append` maps to `spec.md`'s
/// `StoreWriteError`; `Scan` has no direct counterpart in the spec's error
/// table (a scan failure is not one of the listed session-closing kinds)
/// but is threaded through so an implementation can surface I/O failures
/// rather than panic.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `append` could not durably record the batch.
    #[error("store write failed: {0}")]
    Append(String),
    /// `scan` could not read back the stored records.
    #[error("store read failed: {0}")]
    Scan(String),
}

/// Thin contract over the external bet-persistence layer (`spec.md` §4.C).
///
/// Implementations must uphold: a `scan()` call never observes a partial
/// `append()` (enforced by the locking discipline in `spec.md` §4.G, not by
/// this trait itself — callers serialize writes and exclude them from
/// concurrent scans).
#[async_trait]
pub trait BetStore: Send + Sync + 'static {
    /// Atomically append `bets`. A later `scan()` in the same process must
    /// observe them.
    async fn append(&self, bets: Vec<Bet>) -> Result<(), StoreError>;

    /// A stable snapshot of every stored bet, in append order.
    async fn scan(&self) -> Result<Vec<Bet>, StoreError>;

    /// Pure predicate: did this bet win?
    fn is_winner(&self, bet: &Bet) -> bool;
}

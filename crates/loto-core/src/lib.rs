//! Domain logic for the lottery intake service: barrier state, the
//! bet-store contract, and the pure half of the session state machine.
//!
//! This crate is sans-IO; it holds no sockets and spawns no tasks. The
//! async orchestration that drives it lives in `loto-server`.

pub mod barrier;
pub mod session;
pub mod store;

pub use barrier::BarrierState;
pub use session::{classify, ClassifyError, ParsedRequest, SessionState};
pub use store::{BetStore, StoreError};

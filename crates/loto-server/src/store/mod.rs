//! Concrete `BetStore` adapters (`spec.md` §4.C).
//!
//! The core crate only sees the `loto_core::BetStore` trait; this module
//! supplies two implementations: an in-memory store for tests, and an
//! append-only file store for production, grounded on `lockframe-server`'s
//! `storage` module split (`memory.rs` / `redb.rs` each behind the same
//! `Storage` trait).

mod file;
mod memory;

use std::sync::Arc;

pub use file::FileStore;
use loto_core::BetStore;
pub use memory::MemoryStore;

/// A type-erased, shared handle to whichever [`BetStore`] the server was
/// started with (`spec.md` §3: "Barrier state and the store are shared by
/// all sessions").
pub type BetStoreHandle = Arc<dyn BetStore>;

/// Default winning number, used when no override is supplied
/// (`spec.md` §4.C: "a constant the adapter owns" — see `DESIGN.md`'s Open
/// Decisions for why this value is not fixed by the spec).
pub const DEFAULT_WINNING_NUMBER: u16 = 7574;

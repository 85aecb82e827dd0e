//! Startup configuration, parsed from the command line (`spec.md` §6:
//! "Startup configuration (from the external invoker)").
//!
//! Grounded on `lockframe-server/src/main.rs`'s `clap`-derive `Args` struct.

use std::time::Duration;

use clap::Parser;

/// CLI arguments for the `loto-server` binary.
#[derive(Parser, Debug)]
#[command(name = "loto-server")]
#[command(about = "Lottery intake and result-distribution server")]
#[command(version)]
pub struct Args {
    /// TCP port to listen on.
    #[arg(short, long, default_value_t = 12345)]
    pub port: u16,

    /// Listen backlog for the bound socket.
    #[arg(short, long, default_value_t = 5)]
    pub backlog: u32,

    /// Number of distinct agencies that must declare `FINISHED_SENDING`
    /// before `WINNERS_REQUEST` stops returning `LOTTERY_NOT_READY`.
    #[arg(short = 'n', long, default_value_t = 5)]
    pub expected_agencies: u32,

    /// Path to the append-only bet store file. If omitted, bets are held
    /// only in memory for the lifetime of the process.
    #[arg(long)]
    pub store_path: Option<String>,

    /// Accept-loop timeout in milliseconds; bounds how long shutdown can
    /// take to notice an idle listener (`spec.md` §4.F).
    #[arg(long, default_value_t = 5000)]
    pub accept_timeout_ms: u64,

    /// Log level passed to the `tracing` env filter when `RUST_LOG` is
    /// unset (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Runtime configuration derived from [`Args`], used by [`crate::Server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to bind.
    pub port: u16,
    /// Listen backlog.
    pub backlog: u32,
    /// Agencies that must finish before the barrier is ready.
    pub expected_agencies: u32,
    /// Duration of each `accept()` timeout iteration.
    pub accept_timeout: Duration,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            port: args.port,
            backlog: args.backlog,
            expected_agencies: args.expected_agencies,
            accept_timeout: Duration::from_millis(args.accept_timeout_ms),
        }
    }
}

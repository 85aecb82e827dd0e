//! Filesystem-backed append-only `BetStore` (`spec.md` §1: "assumed to be a
//! filesystem-backed append-on-write store with bulk read").
//!
//! Line format: `agency_id,first_name,last_name,document,birthdate,number`,
//! one bet per line (see `DESIGN.md`'s Open Decisions for why this is safe —
//! none of the six fields can themselves contain a comma once past the
//! payload codec).

use std::path::PathBuf;

use async_trait::async_trait;
use loto_proto::Bet;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::RwLock;

use loto_core::store::{BetStore, StoreError};

use super::DEFAULT_WINNING_NUMBER;

/// Append-only, line-delimited bet store backed by a single file.
///
/// Guarded by a `tokio::sync::RwLock<()>`: `append` takes the write side,
/// `scan` the read side, matching the `store_write_lock`/`store_read_lock`
/// split of `spec.md` §4.G. The lock lives on the store itself rather than
/// only at the server scope so the invariant ("no scan overlaps an append")
/// holds regardless of how many server-level callers share this adapter.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: RwLock<()>,
    winning_number: u16,
}

fn encode_line(bet: &Bet) -> String {
    format!(
        "{},{},{},{},{},{}\n",
        bet.agency_id, bet.first_name, bet.last_name, bet.document, bet.birthdate, bet.number
    )
}

fn decode_line(line: &str) -> Option<Bet> {
    let mut fields = line.splitn(6, ',');
    let agency_id = fields.next()?.parse::<u32>().ok()?;
    let first_name = fields.next()?.to_string();
    let last_name = fields.next()?.to_string();
    let document = fields.next()?.to_string();
    let birthdate = fields.next()?.to_string();
    let number = fields.next()?.trim_end().parse::<u16>().ok()?;
    Some(Bet { agency_id, first_name, last_name, document, birthdate, number })
}

impl FileStore {
    /// Open (creating if absent) the append-only store at `path`, using
    /// [`DEFAULT_WINNING_NUMBER`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Append`] if the file cannot be created/opened.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_winning_number(path, DEFAULT_WINNING_NUMBER).await
    }

    /// Open with a non-default winning number (tests and operators who need
    /// a deterministic draw).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Append`] if the file cannot be created/opened.
    pub async fn open_with_winning_number(
        path: impl Into<PathBuf>,
        winning_number: u16,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|err| StoreError::Append(err.to_string()))?;

        Ok(Self { path, lock: RwLock::new(()), winning_number })
    }
}

#[async_trait]
impl BetStore for FileStore {
    async fn append(&self, bets: Vec<Bet>) -> Result<(), StoreError> {
        let _guard = self.lock.write().await;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|err| StoreError::Append(err.to_string()))?;

        let mut buf = String::new();
        for bet in &bets {
            buf.push_str(&encode_line(bet));
        }

        file.write_all(buf.as_bytes()).await.map_err(|err| StoreError::Append(err.to_string()))?;
        file.flush().await.map_err(|err| StoreError::Append(err.to_string()))?;
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Bet>, StoreError> {
        let _guard = self.lock.read().await;

        let mut file =
            OpenOptions::new().read(true).open(&self.path).await.map_err(|err| {
                StoreError::Scan(err.to_string())
            })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|err| StoreError::Scan(err.to_string()))?;

        Ok(contents.lines().filter_map(decode_line).collect())
    }

    fn is_winner(&self, bet: &Bet) -> bool {
        bet.number == self.winning_number
    }
}

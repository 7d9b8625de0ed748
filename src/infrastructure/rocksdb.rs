use crate::domain::ports::RaffleStore;
use crate::domain::raffle::Raffle;
use crate::error::{RaffleError, Result};
use async_trait::async_trait;
use rocksdb::{DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Key under which the raffle snapshot is stored.
const RAFFLE_KEY: &[u8] = b"raffle";

/// A persistent raffle store using RocksDB.
///
/// The whole aggregate is stored as one JSON value under a fixed key; the
/// raffle is a singleton, so there is no keyspace to partition.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path).map_err(storage_err)?;
        Ok(Self { db: Arc::new(db) })
    }
}

fn storage_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> RaffleError {
    RaffleError::Storage(Box::new(e))
}

#[async_trait]
impl RaffleStore for RocksDbStore {
    async fn save(&self, raffle: &Raffle) -> Result<()> {
        let value = serde_json::to_vec(raffle).map_err(storage_err)?;
        self.db.put(RAFFLE_KEY, value).map_err(storage_err)?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<Raffle>> {
        match self.db.get(RAFFLE_KEY).map_err(storage_err)? {
            Some(bytes) => {
                let raffle = serde_json::from_slice(&bytes).map_err(storage_err)?;
                Ok(Some(raffle))
            }
            None => Ok(None),
        }
    }
}

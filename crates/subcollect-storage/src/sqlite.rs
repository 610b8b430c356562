//! SQLite storage backend.
//!
//! Persists collected records to a single SQLite file via `sqlx`, WAL mode
//! enabled for concurrent read throughput. Table and column names follow
//! the relational schema the collector has always used.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use subcollect_core::{
    BlockRecord, CollectError, EventDetailRecord, EventKind, EventRecord, ExtrinsicRecord, Height,
    SpaceSample, Store,
};

fn storage_err(e: sqlx::Error) -> CollectError {
    CollectError::Storage(e.to_string())
}

/// SQLite-backed collector storage.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at `path`.
    ///
    /// The path may be a plain file path (`"./collect.db"`) or a full
    /// SQLite URL (`"sqlite:./collect.db?mode=rwc"`).
    pub async fn open(path: &str) -> Result<Self, CollectError> {
        let url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite:{path}?mode=rwc")
        };
        let pool = SqlitePool::connect(&url).await.map_err(storage_err)?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory SQLite database. All data is lost when the pool
    /// is dropped; ideal for tests.
    pub async fn in_memory() -> Result<Self, CollectError> {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .map_err(storage_err)?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), CollectError> {
        sqlx::query("PRAGMA journal_mode=WAL;")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        for ddl in [
            "CREATE TABLE IF NOT EXISTS blocks (
                id               TEXT PRIMARY KEY,
                height           INTEGER NOT NULL,
                hash             TEXT NOT NULL,
                parent_hash      TEXT NOT NULL,
                author           TEXT NOT NULL,
                state_root       TEXT NOT NULL,
                extrinsics_root  TEXT NOT NULL,
                spec_id          TEXT NOT NULL,
                timestamp        INTEGER NOT NULL,
                extrinsic_count  INTEGER NOT NULL,
                event_count      INTEGER NOT NULL
            );",
            "CREATE INDEX IF NOT EXISTS idx_blocks_height ON blocks (height);",
            "CREATE TABLE IF NOT EXISTS extrinsics (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                hash           TEXT NOT NULL,
                block_height   INTEGER NOT NULL,
                index_in_block INTEGER NOT NULL,
                timestamp      INTEGER NOT NULL,
                success        INTEGER NOT NULL,
                cursor         TEXT NOT NULL
            );",
            "CREATE INDEX IF NOT EXISTS idx_extrinsics_height ON extrinsics (block_height);",
            "CREATE TABLE IF NOT EXISTS events (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                phase           TEXT NOT NULL,
                block_height    INTEGER NOT NULL,
                block_id        TEXT NOT NULL,
                index_in_block  INTEGER NOT NULL,
                extrinsic_index INTEGER
            );",
            "CREATE INDEX IF NOT EXISTS idx_events_height ON events (block_height);",
            "CREATE INDEX IF NOT EXISTS idx_events_name ON events (name);",
            "CREATE TABLE IF NOT EXISTS event_details (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                block_height   INTEGER NOT NULL,
                public_key     TEXT NOT NULL,
                parent_hash    TEXT NOT NULL,
                reward_address TEXT NOT NULL
            );",
            "CREATE INDEX IF NOT EXISTS idx_event_details_height ON event_details (block_height);",
            "CREATE TABLE IF NOT EXISTS spaces (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL,
                pledged   INTEGER NOT NULL
            );",
        ] {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(storage_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn save_block(&self, block: &BlockRecord) -> Result<(), CollectError> {
        sqlx::query(
            "INSERT OR REPLACE INTO blocks
             (id, height, hash, parent_hash, author, state_root, extrinsics_root,
              spec_id, timestamp, extrinsic_count, event_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&block.id)
        .bind(block.height as i64)
        .bind(&block.hash)
        .bind(&block.parent_hash)
        .bind(&block.author)
        .bind(&block.state_root)
        .bind(&block.extrinsics_root)
        .bind(&block.spec_id)
        .bind(block.timestamp)
        .bind(block.extrinsics_count as i64)
        .bind(block.events_count as i64)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn save_extrinsic(&self, extrinsic: &ExtrinsicRecord) -> Result<(), CollectError> {
        sqlx::query(
            "INSERT OR REPLACE INTO extrinsics
             (id, name, hash, block_height, index_in_block, timestamp, success, cursor)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&extrinsic.id)
        .bind(&extrinsic.name)
        .bind(&extrinsic.hash)
        .bind(extrinsic.height as i64)
        .bind(extrinsic.index_in_block as i64)
        .bind(extrinsic.timestamp)
        .bind(extrinsic.success)
        .bind(&extrinsic.cursor)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn save_event(&self, event: &EventRecord) -> Result<(), CollectError> {
        sqlx::query(
            "INSERT OR REPLACE INTO events
             (id, name, phase, block_height, block_id, index_in_block, extrinsic_index)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.phase)
        .bind(event.height as i64)
        .bind(&event.block_id)
        .bind(event.index_in_block as i64)
        .bind(event.extrinsic_index.map(|i| i as i64))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn save_event_detail(&self, detail: &EventDetailRecord) -> Result<(), CollectError> {
        sqlx::query(
            "INSERT OR REPLACE INTO event_details
             (id, name, block_height, public_key, parent_hash, reward_address)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&detail.id)
        .bind(detail.kind.as_str())
        .bind(detail.height as i64)
        .bind(&detail.public_key)
        .bind(&detail.parent_hash)
        .bind(&detail.reward_address)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn save_space_sample(&self, sample: &SpaceSample) -> Result<(), CollectError> {
        sqlx::query("INSERT INTO spaces (timestamp, pledged) VALUES (?, ?)")
            .bind(sample.timestamp)
            .bind(sample.pledged)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn recent_extrinsics(&self, limit: u32) -> Result<Vec<ExtrinsicRecord>, CollectError> {
        let rows = sqlx::query(
            "SELECT id, name, hash, block_height, index_in_block, timestamp, success, cursor
             FROM extrinsics ORDER BY block_height DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows
            .into_iter()
            .map(|row| ExtrinsicRecord {
                id: row.get("id"),
                name: row.get("name"),
                hash: row.get("hash"),
                height: row.get::<i64, _>("block_height") as Height,
                index_in_block: row.get::<i64, _>("index_in_block") as u32,
                timestamp: row.get("timestamp"),
                success: row.get("success"),
                cursor: row.get("cursor"),
            })
            .collect())
    }

    async fn events_by_kind(&self, kind: EventKind) -> Result<Vec<EventRecord>, CollectError> {
        let rows = sqlx::query(
            "SELECT id, name, phase, block_height, block_id, index_in_block, extrinsic_index
             FROM events WHERE name = ? ORDER BY block_height, index_in_block",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows
            .into_iter()
            .map(|row| EventRecord {
                id: row.get("id"),
                name: row.get("name"),
                phase: row.get("phase"),
                height: row.get::<i64, _>("block_height") as Height,
                block_id: row.get("block_id"),
                index_in_block: row.get::<i64, _>("index_in_block") as u32,
                extrinsic_index: row
                    .get::<Option<i64>, _>("extrinsic_index")
                    .map(|i| i as u32),
            })
            .collect())
    }

    async fn space_samples(&self) -> Result<Vec<SpaceSample>, CollectError> {
        let rows = sqlx::query("SELECT timestamp, pledged FROM spaces ORDER BY timestamp")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(rows
            .into_iter()
            .map(|row| SpaceSample {
                timestamp: row.get("timestamp"),
                pledged: row.get("pledged"),
            })
            .collect())
    }

    async fn block_by_height(&self, height: Height) -> Result<Option<BlockRecord>, CollectError> {
        let row = sqlx::query(
            "SELECT id, height, hash, parent_hash, author, state_root, extrinsics_root,
                    spec_id, timestamp, extrinsic_count, event_count
             FROM blocks WHERE height = ?",
        )
        .bind(height as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(|row| BlockRecord {
            id: row.get("id"),
            height: row.get::<i64, _>("height") as Height,
            hash: row.get("hash"),
            parent_hash: row.get("parent_hash"),
            author: row.get("author"),
            state_root: row.get("state_root"),
            extrinsics_root: row.get("extrinsics_root"),
            spec_id: row.get("spec_id"),
            timestamp: row.get("timestamp"),
            extrinsics_count: row.get::<i64, _>("extrinsic_count") as u32,
            events_count: row.get::<i64, _>("event_count") as u32,
        }))
    }
}

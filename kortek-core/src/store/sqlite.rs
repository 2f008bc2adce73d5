use crate::endpoint::{EndpointId, NewEndpoint, PersistedEndpoint};
use crate::monitor::{MonitorRecord, MonitorStatus, MonitorUpdate};
use crate::store::{EndpointStore, StoreError};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS api_endpoints (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    url           TEXT    NOT NULL,
    source_domain TEXT    NOT NULL DEFAULT '',
    priority      INTEGER NOT NULL DEFAULT 0,
    is_active     INTEGER NOT NULL DEFAULT 1,
    success_count INTEGER NOT NULL DEFAULT 0,
    last_used     TEXT,
    created_at    TEXT    NOT NULL,
    updated_at    TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS api_monitors (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    endpoint_id      INTEGER NOT NULL REFERENCES api_endpoints(id) ON DELETE CASCADE,
    endpoint_path    TEXT    NOT NULL,
    status           TEXT    NOT NULL DEFAULT 'unknown',
    response_time    INTEGER,
    last_checked     TEXT    NOT NULL,
    error_message    TEXT,
    response_snippet TEXT,
    UNIQUE (endpoint_id, endpoint_path)
);

CREATE INDEX IF NOT EXISTS idx_api_endpoints_rank
    ON api_endpoints (is_active, priority DESC, name);
"#;

const ENDPOINT_COLUMNS: &str = "id, name, url, source_domain, priority, is_active, \
     success_count, last_used, created_at, updated_at";

const MONITOR_COLUMNS: &str = "endpoint_id, endpoint_path, status, response_time, \
     last_checked, error_message, response_snippet";

/// SQLite-backed store. One connection guarded by a mutex; every call is a short
/// local operation.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

//-----------------------------------------------------------------------------
// Row mapping
//-----------------------------------------------------------------------------

struct EndpointRow {
    id: i64,
    name: String,
    url: String,
    source_domain: String,
    priority: i32,
    is_active: bool,
    success_count: i64,
    last_used: Option<String>,
    created_at: String,
    updated_at: String,
}

impl EndpointRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            source_domain: row.get(3)?,
            priority: row.get(4)?,
            is_active: row.get(5)?,
            success_count: row.get(6)?,
            last_used: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_endpoint(self) -> Result<PersistedEndpoint, StoreError> {
        Ok(PersistedEndpoint {
            id: EndpointId(self.id),
            name: self.name,
            url: self.url,
            source_domain: self.source_domain,
            priority: self.priority,
            active: self.is_active,
            success_count: u64::try_from(self.success_count).map_err(|_| StoreError::Corrupt {
                column: "success_count",
                value: self.success_count.to_string(),
            })?,
            last_used: self
                .last_used
                .map(|v| parse_timestamp("last_used", &v))
                .transpose()?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

struct MonitorRow {
    endpoint_id: i64,
    endpoint_path: String,
    status: String,
    response_time: Option<i64>,
    last_checked: String,
    error_message: Option<String>,
    response_snippet: Option<String>,
}

impl MonitorRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            endpoint_id: row.get(0)?,
            endpoint_path: row.get(1)?,
            status: row.get(2)?,
            response_time: row.get(3)?,
            last_checked: row.get(4)?,
            error_message: row.get(5)?,
            response_snippet: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<MonitorRecord, StoreError> {
        let status: MonitorStatus = self.status.parse().map_err(|_| StoreError::Corrupt {
            column: "status",
            value: self.status.clone(),
        })?;

        Ok(MonitorRecord {
            endpoint_id: EndpointId(self.endpoint_id),
            logical_path: self.endpoint_path,
            status,
            response_time_ms: self.response_time.map(|v| v.max(0) as u64),
            error_message: self.error_message,
            response_snippet: self.response_snippet,
            last_checked: parse_timestamp("last_checked", &self.last_checked)?,
        })
    }
}

fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt {
            column,
            value: value.to_string(),
        })
}

fn fetch_endpoint(conn: &Connection, id: EndpointId) -> Result<Option<PersistedEndpoint>, StoreError> {
    let sql = format!("SELECT {ENDPOINT_COLUMNS} FROM api_endpoints WHERE id = ?1");
    conn.query_row(&sql, params![id.0], EndpointRow::from_row)
        .optional()?
        .map(EndpointRow::into_endpoint)
        .transpose()
}

//-----------------------------------------------------------------------------
// Store
//-----------------------------------------------------------------------------

impl EndpointStore for SqliteStore {
    fn list_endpoints(&self) -> Result<Vec<PersistedEndpoint>, StoreError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {ENDPOINT_COLUMNS} FROM api_endpoints");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], EndpointRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(EndpointRow::into_endpoint).collect()
    }

    fn get_endpoint(&self, id: EndpointId) -> Result<Option<PersistedEndpoint>, StoreError> {
        let conn = self.lock()?;
        fetch_endpoint(&conn, id)
    }

    fn insert_endpoint(
        &self,
        new: &NewEndpoint,
        now: DateTime<Utc>,
    ) -> Result<PersistedEndpoint, StoreError> {
        let conn = self.lock()?;
        let stamp = now.to_rfc3339();
        conn.execute(
            "INSERT INTO api_endpoints \
             (name, url, source_domain, priority, is_active, success_count, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
            params![
                new.name,
                new.url,
                new.source_domain,
                new.priority,
                new.active,
                stamp
            ],
        )?;

        let id = EndpointId(conn.last_insert_rowid());
        fetch_endpoint(&conn, id)?.ok_or(StoreError::UnknownEndpoint(id))
    }

    fn save_endpoint(&self, endpoint: &PersistedEndpoint) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE api_endpoints SET name = ?1, url = ?2, source_domain = ?3, priority = ?4, \
             is_active = ?5, updated_at = ?6 WHERE id = ?7",
            params![
                endpoint.name,
                endpoint.url,
                endpoint.source_domain,
                endpoint.priority,
                endpoint.active,
                endpoint.updated_at.to_rfc3339(),
                endpoint.id.0
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_endpoint(&self, id: EndpointId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        // Monitor rows go with it through ON DELETE CASCADE.
        let changed = conn.execute("DELETE FROM api_endpoints WHERE id = ?1", params![id.0])?;
        Ok(changed > 0)
    }

    fn upsert_monitor(&self, update: &MonitorUpdate) -> Result<MonitorRecord, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let checked_at = update.checked_at.to_rfc3339();

        let known = if update.status.is_up() {
            tx.execute(
                "UPDATE api_endpoints SET success_count = success_count + 1, last_used = ?1 \
                 WHERE id = ?2",
                params![checked_at, update.endpoint_id.0],
            )? > 0
        } else {
            tx.query_row(
                "SELECT COUNT(*) FROM api_endpoints WHERE id = ?1",
                params![update.endpoint_id.0],
                |row| row.get::<_, i64>(0),
            )? > 0
        };

        if !known {
            return Err(StoreError::UnknownEndpoint(update.endpoint_id));
        }

        tx.execute(
            "INSERT INTO api_monitors \
             (endpoint_id, endpoint_path, status, response_time, last_checked, error_message, response_snippet) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT (endpoint_id, endpoint_path) DO UPDATE SET \
                status = excluded.status, \
                response_time = excluded.response_time, \
                last_checked = excluded.last_checked, \
                error_message = excluded.error_message, \
                response_snippet = excluded.response_snippet",
            params![
                update.endpoint_id.0,
                update.logical_path,
                update.status.as_str(),
                update.response_time_ms.map(|v| v as i64),
                checked_at,
                update.error_message,
                update.response_snippet
            ],
        )?;

        tx.commit()?;
        Ok(update.clone().into_record())
    }

    fn list_monitors(&self) -> Result<Vec<MonitorRecord>, StoreError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {MONITOR_COLUMNS} FROM api_monitors ORDER BY endpoint_id, endpoint_path"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], MonitorRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(MonitorRow::into_record).collect()
    }
}

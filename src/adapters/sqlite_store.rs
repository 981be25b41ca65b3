//! SQLite indicator store.
//!
//! One table per ticker: `date INTEGER PRIMARY KEY` (epoch seconds) followed
//! by one `INTEGER` column per indicator. Every operation opens its own
//! connection and closes it on return.

use crate::domain::derivation::TickerRow;
use crate::domain::error::IngestError;
use crate::domain::indicator::IndicatorSpec;
use crate::domain::ticker::Ticker;
use crate::ports::store_port::StorePort;
use rusqlite::{Connection, OpenFlags, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    ReadWriteCreate,
}

impl AccessMode {
    fn flags(self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_NO_MUTEX;
        match self {
            AccessMode::ReadOnly => base | OpenFlags::SQLITE_OPEN_READ_ONLY,
            AccessMode::ReadWrite => base | OpenFlags::SQLITE_OPEN_READ_WRITE,
            AccessMode::ReadWriteCreate => {
                base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        }
    }
}

pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self, mode: AccessMode) -> Result<Connection, IngestError> {
        Connection::open_with_flags(&self.path, mode.flags()).map_err(|e| IngestError::Store {
            reason: format!("cannot open {}: {e}", self.path.display()),
        })
    }

    fn sidecar(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Delete the previous store together with any journal, WAL or shared
    /// memory file left beside it.
    fn remove_existing(&self) -> Result<(), IngestError> {
        let files = std::iter::once(self.path.clone())
            .chain(SIDECAR_SUFFIXES.iter().map(|s| self.sidecar(s)));
        for file in files {
            match std::fs::remove_file(&file) {
                Ok(()) => debug!(path = %file.display(), "removed previous store file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(IngestError::Store {
                        reason: format!("cannot remove {}: {e}", file.display()),
                    });
                }
            }
        }
        Ok(())
    }
}

fn create_table_sql(ticker: &Ticker, spec: &IndicatorSpec) -> Result<String, IngestError> {
    let mut columns = vec!["date INTEGER NOT NULL PRIMARY KEY".to_string()];
    for kind in spec.kinds() {
        columns.push(format!("{} INTEGER", kind.column_name()?.quoted()));
    }
    Ok(format!(
        "CREATE TABLE {} ({})",
        ticker.table_name().quoted(),
        columns.join(", ")
    ))
}

fn insert_sql(ticker: &Ticker, width: usize) -> String {
    let placeholders: Vec<String> = (1..=width + 1).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} VALUES ({})",
        ticker.table_name().quoted(),
        placeholders.join(", ")
    )
}

impl StorePort for SqliteStore {
    fn create_schema(&self, tickers: &[Ticker], spec: &IndicatorSpec) -> Result<(), IngestError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| IngestError::Store {
                reason: format!("cannot create {}: {e}", dir.display()),
            })?;
        }
        self.remove_existing()?;

        let statements = tickers
            .iter()
            .map(|t| create_table_sql(t, spec))
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.open(AccessMode::ReadWriteCreate)?;
        let tx = conn.transaction()?;
        for sql in &statements {
            tx.execute(sql, [])?;
        }
        tx.commit()?;

        info!(
            path = %self.path.display(),
            tables = tickers.len(),
            columns = spec.len(),
            "created store"
        );
        Ok(())
    }

    fn write_rows(&self, ticker: &Ticker, rows: &[TickerRow]) -> Result<usize, IngestError> {
        let Some(first) = rows.first() else {
            return Ok(0);
        };
        let width = first.values.len();
        if let Some(bad) = rows.iter().find(|r| r.values.len() != width) {
            return Err(IngestError::Store {
                reason: format!(
                    "row at {} has {} values, expected {width}",
                    bad.date,
                    bad.values.len()
                ),
            });
        }

        let mut conn = self.open(AccessMode::ReadWrite)?;
        // dropped without commit on any error, which rolls back
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert_sql(ticker, width))?;
            for row in rows {
                let params = std::iter::once(row.date).chain(row.values.iter().copied());
                stmt.execute(params_from_iter(params))?;
            }
        }
        tx.commit()?;

        debug!(%ticker, rows = rows.len(), "rows written");
        Ok(rows.len())
    }

    fn read_rows(&self, ticker: &Ticker) -> Result<Vec<TickerRow>, IngestError> {
        let conn = self.open(AccessMode::ReadOnly)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY date ASC",
            ticker.table_name().quoted()
        ))?;
        let width = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            let date: i64 = row.get(0)?;
            let values = (1..width)
                .map(|i| row.get::<_, i64>(i))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TickerRow { date, values })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn table_columns(&self, ticker: &Ticker) -> Result<Vec<String>, IngestError> {
        let conn = self.open(AccessMode::ReadOnly)?;
        let stmt = conn.prepare(&format!(
            "SELECT * FROM {} LIMIT 0",
            ticker.table_name().quoted()
        ))?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    fn list_tables(&self) -> Result<Vec<String>, IngestError> {
        let conn = self.open(AccessMode::ReadOnly)?;
        let mut stmt = conn.prepare(
            r"SELECT name FROM sqlite_master
              WHERE type = 'table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
              ORDER BY name",
        )?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for name in names {
            out.push(name?);
        }
        Ok(out)
    }
}

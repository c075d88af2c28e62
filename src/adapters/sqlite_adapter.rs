//! SQLite trade store adapter.

use crate::domain::account::Account;
use crate::domain::error::TradeTaggerError;
use crate::domain::records::{TaggedExecution, TaggedStopOrder, TradeId};
use crate::domain::trade_summary::TradeSummary;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::TradeStore;
use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Transaction};

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn db_err(e: r2d2::Error) -> TradeTaggerError {
    TradeTaggerError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> TradeTaggerError {
    TradeTaggerError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn to_sql_ts(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339())
}

fn from_sql_ts(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn count_rows(tx: &Transaction<'_>, table: &str) -> Result<i64, TradeTaggerError> {
    tx.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .map_err(query_err)
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradeTaggerError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| TradeTaggerError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4);
        let pool_size = u32::try_from(pool_size)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| TradeTaggerError::ConfigInvalid {
                section: "sqlite".into(),
                key: "pool_size".into(),
                reason: format!("pool_size must be between 1 and {}, got {pool_size}", u32::MAX),
            })?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(db_err)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, TradeTaggerError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, TradeTaggerError> {
        self.pool.get().map_err(db_err)
    }

    /// Trade id currently stored for an execution, if the row exists.
    pub fn execution_trade_id(
        &self,
        execution_id: &str,
    ) -> Result<Option<Option<TradeId>>, TradeTaggerError> {
        let conn = self.conn()?;
        let stored: Option<Option<i64>> = conn
            .query_row(
                "SELECT trade_id FROM executions WHERE execution_id = ?1",
                params![execution_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_err)?;
        Ok(stored.map(|id| id.map(|v| TradeId(v as u64))))
    }
}

impl TradeStore for SqliteAdapter {
    fn initialize_schema(&self) -> Result<(), TradeTaggerError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS accounts (
                account_number TEXT PRIMARY KEY,
                currency TEXT,
                type TEXT CHECK (type IN ('paper', 'live'))
            );
            CREATE TABLE IF NOT EXISTS executions (
                execution_id TEXT PRIMARY KEY,
                order_id TEXT,
                parent_order_id TEXT,
                created_at TEXT,
                filled_at TEXT,
                filled_avg_price REAL,
                filled_qty REAL NOT NULL,
                status TEXT,
                symbol TEXT NOT NULL,
                side TEXT,
                position_intent TEXT NOT NULL,
                account_number TEXT NOT NULL REFERENCES accounts(account_number),
                trade_id INTEGER
            );
            CREATE TABLE IF NOT EXISTS stop_orders (
                id TEXT PRIMARY KEY,
                created_at TEXT,
                stop_price REAL,
                qty REAL NOT NULL,
                symbol TEXT NOT NULL,
                side TEXT,
                type TEXT,
                account_number TEXT NOT NULL REFERENCES accounts(account_number),
                trade_id INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_executions_trade ON executions(account_number, trade_id);
            CREATE INDEX IF NOT EXISTS idx_stop_orders_trade ON stop_orders(account_number, trade_id);",
        )
        .map_err(query_err)?;

        Ok(())
    }

    fn upsert_account(&self, account: &Account) -> Result<(), TradeTaggerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (account_number, currency, type)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (account_number) DO NOTHING",
            params![account.number, account.currency, account.account_type.as_str()],
        )
        .map_err(query_err)?;
        Ok(())
    }

    fn upsert_executions(
        &self,
        executions: &[TaggedExecution],
        account_number: &str,
    ) -> Result<usize, TradeTaggerError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        let before = count_rows(&tx, "executions")?;

        for tagged in executions {
            let e = &tagged.execution;
            tx.execute(
                "INSERT INTO executions (
                    execution_id, order_id, parent_order_id, created_at, filled_at,
                    filled_avg_price, filled_qty, status, symbol, side,
                    position_intent, account_number, trade_id
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                 ON CONFLICT (execution_id) DO UPDATE SET
                    status = excluded.status,
                    trade_id = excluded.trade_id",
                params![
                    e.id,
                    e.order_id,
                    e.parent_order_id,
                    to_sql_ts(e.created_at),
                    to_sql_ts(e.filled_at),
                    e.filled_avg_price,
                    tagged.filled_qty,
                    e.status,
                    e.symbol,
                    e.side,
                    e.position_intent.as_str(),
                    account_number,
                    tagged.trade_id.map(|id| id.0 as i64),
                ],
            )
            .map_err(query_err)?;
        }

        let after = count_rows(&tx, "executions")?;
        tx.commit().map_err(query_err)?;
        Ok((after - before) as usize)
    }

    fn upsert_stop_orders(
        &self,
        stops: &[TaggedStopOrder],
        account_number: &str,
    ) -> Result<usize, TradeTaggerError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        let before = count_rows(&tx, "stop_orders")?;

        for tagged in stops {
            let s = &tagged.stop;
            tx.execute(
                "INSERT INTO stop_orders (
                    id, created_at, stop_price, qty, symbol, side, type, account_number, trade_id
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT (id) DO UPDATE SET
                    trade_id = excluded.trade_id",
                params![
                    s.id,
                    to_sql_ts(s.created_at),
                    s.stop_price,
                    tagged.qty,
                    s.symbol,
                    s.side,
                    s.order_type,
                    account_number,
                    tagged.trade_id.0 as i64,
                ],
            )
            .map_err(query_err)?;
        }

        let after = count_rows(&tx, "stop_orders")?;
        tx.commit().map_err(query_err)?;
        Ok((after - before) as usize)
    }

    fn trade_summaries(&self, account_number: &str) -> Result<Vec<TradeSummary>, TradeTaggerError> {
        let conn = self.conn()?;

        let query = "SELECT e.trade_id,
                            MIN(e.symbol),
                            SUM(CASE WHEN e.position_intent IN ('entry_buy', 'entry_sell')
                                     THEN e.filled_qty ELSE 0 END),
                            SUM(CASE WHEN e.position_intent IN ('close_buy', 'close_sell')
                                     THEN e.filled_qty ELSE 0 END),
                            COUNT(*),
                            (SELECT COUNT(*) FROM stop_orders s
                              WHERE s.account_number = ?1
                                AND s.trade_id = e.trade_id),
                            MIN(e.filled_at),
                            MAX(e.filled_at)
                     FROM executions e
                     WHERE e.account_number = ?1 AND e.trade_id IS NOT NULL
                     GROUP BY e.trade_id
                     ORDER BY e.trade_id ASC";

        let mut stmt = conn.prepare(query).map_err(query_err)?;

        let rows = stmt
            .query_map(params![account_number], |row| {
                let trade_id: i64 = row.get(0)?;
                let executions: i64 = row.get(4)?;
                let stops: i64 = row.get(5)?;
                Ok(TradeSummary {
                    trade_id: TradeId(trade_id as u64),
                    symbol: row.get(1)?,
                    entry_qty: row.get(2)?,
                    close_qty: row.get(3)?,
                    executions: executions as usize,
                    stops: stops as usize,
                    opened_at: from_sql_ts(row.get(6)?),
                    last_fill_at: from_sql_ts(row.get(7)?),
                })
            })
            .map_err(query_err)?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row.map_err(query_err)?);
        }

        Ok(summaries)
    }
}

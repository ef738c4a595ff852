//! # 数据库模式
//!
//! 建表、版本检查与插入操作。
//!
//! ## 表结构
//! ```text
//! entries(id, name, path, latex)
//! calculations(id, entry_id, band_gap, poscar, incar)
//! formations(id, entry_id, calculation_id, delta_e)
//! meta(version)
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/import.rs` 和测试使用
//! - 使用 `rusqlite`

use crate::error::{GarnetError, Result};

use rusqlite::{params, Connection, OptionalExtension};

pub const SCHEMA_VERSION: i64 = 1;

/// 建表（幂等）并检查模式版本
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS meta(version INTEGER NOT NULL);
        CREATE TABLE IF NOT EXISTS entries(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            path TEXT NOT NULL DEFAULT '',
            latex TEXT
        );
        CREATE TABLE IF NOT EXISTS calculations(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id INTEGER NOT NULL,
            band_gap REAL,
            poscar TEXT,
            incar TEXT,
            FOREIGN KEY(entry_id) REFERENCES entries(id)
        );
        CREATE TABLE IF NOT EXISTS formations(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id INTEGER NOT NULL,
            calculation_id INTEGER,
            delta_e REAL NOT NULL,
            FOREIGN KEY(entry_id) REFERENCES entries(id),
            FOREIGN KEY(calculation_id) REFERENCES calculations(id)
        );
        CREATE INDEX IF NOT EXISTS idx_entries_name ON entries(name);
        COMMIT;",
    )?;
    set_version(conn, SCHEMA_VERSION)
}

fn set_version(conn: &Connection, version: i64) -> Result<()> {
    let existing: Option<i64> = conn
        .query_row("SELECT version FROM meta LIMIT 1", [], |row| row.get(0))
        .optional()?;
    match existing {
        Some(current) if current == version => Ok(()),
        Some(current) => Err(GarnetError::SchemaVersion {
            found: current,
            expected: version,
        }),
        None => {
            conn.execute("INSERT INTO meta(version) VALUES (?1)", params![version])?;
            Ok(())
        }
    }
}

pub fn insert_entry(conn: &Connection, name: &str, path: &str, latex: Option<&str>) -> Result<i64> {
    conn.execute(
        "INSERT INTO entries(name, path, latex) VALUES (?1, ?2, ?3)",
        params![name, path, latex],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_calculation(
    conn: &Connection,
    entry_id: i64,
    band_gap: Option<f64>,
    poscar: Option<&str>,
    incar: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO calculations(entry_id, band_gap, poscar, incar) VALUES (?1, ?2, ?3, ?4)",
        params![entry_id, band_gap, poscar, incar],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_formation(
    conn: &Connection,
    entry_id: i64,
    calculation_id: Option<i64>,
    delta_e: f64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO formations(entry_id, calculation_id, delta_e) VALUES (?1, ?2, ?3)",
        params![entry_id, calculation_id, delta_e],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT version FROM meta", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_version_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute("UPDATE meta SET version = 99", []).unwrap();

        assert!(matches!(
            init_schema(&conn),
            Err(GarnetError::SchemaVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_insert_returns_row_ids() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let entry = insert_entry(&conn, "Li2O", "/icsd/Li2O", None).unwrap();
        let calc = insert_calculation(&conn, entry, Some(5.0), None, None).unwrap();
        let formation = insert_formation(&conn, entry, Some(calc), -2.0).unwrap();
        assert_eq!((entry, calc, formation), (1, 1, 1));
    }
}

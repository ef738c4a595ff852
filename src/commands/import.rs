//! # import 命令实现
//!
//! 从 CSV 导入形成能记录：每行创建一个条目、一个计算与一条形成能记录，
//! 全部在同一事务中完成。
//!
//! ## 依赖关系
//! - 使用 `cli/import.rs` 定义的参数
//! - 使用 `db/schema.rs` 建表与插入
//! - 使用 `models/composition.rs` 校验化学式

use crate::cli::import::ImportArgs;
use crate::db;
use crate::error::{GarnetError, Result};
use crate::models::Composition;
use crate::utils::output;

use rusqlite::Connection;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// CSV 行
#[derive(Debug, Deserialize)]
struct ImportRow {
    name: String,
    path: String,
    delta_e: f64,
    #[serde(default)]
    band_gap: Option<f64>,
    #[serde(default)]
    poscar: Option<String>,
    #[serde(default)]
    incar: Option<String>,
    #[serde(default)]
    latex: Option<String>,
}

/// 执行 import 命令
pub fn execute(args: ImportArgs) -> Result<()> {
    output::print_header("Importing Formation Energies");

    if !args.csv_file.is_file() {
        return Err(GarnetError::FileNotFound {
            path: args.csv_file.display().to_string(),
        });
    }

    let mut conn = Connection::open(&args.database)?;
    let count = import_csv(&mut conn, &args.csv_file)?;

    output::print_success(format!(
        "Imported {} records into '{}'",
        count,
        args.database.display()
    ));

    Ok(())
}

/// 导入 CSV，返回导入的行数。任一行出错则整体回滚。
pub fn import_csv(conn: &mut Connection, csv_path: &Path) -> Result<usize> {
    db::init_schema(conn)?;

    let base_dir = csv_path.parent().unwrap_or_else(|| Path::new("."));
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(csv_path)?;

    let tx = conn.transaction()?;
    let mut count = 0;

    for row in rdr.deserialize() {
        let row: ImportRow = row?;
        Composition::parse(&row.name)?;

        let poscar = read_optional(base_dir, row.poscar.as_deref())?;
        let incar = read_optional(base_dir, row.incar.as_deref())?;

        let entry_id = db::insert_entry(&tx, &row.name, &row.path, row.latex.as_deref())?;
        let calc_id = db::insert_calculation(
            &tx,
            entry_id,
            row.band_gap,
            poscar.as_deref(),
            incar.as_deref(),
        )?;
        db::insert_formation(&tx, entry_id, Some(calc_id), row.delta_e)?;
        count += 1;
    }

    tx.commit()?;
    Ok(count)
}

/// 读取相对 CSV 目录的输入文件
fn read_optional(base_dir: &Path, rel: Option<&str>) -> Result<Option<String>> {
    let rel = match rel {
        Some(r) if !r.is_empty() => r,
        _ => return Ok(None),
    };
    let path = base_dir.join(rel);
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| GarnetError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_import_csv_creates_records() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "POSCAR", "Li3Nd3Te2O12\n1.0\n");
        let csv_path = write(
            dir.path(),
            "data.csv",
            "name,path,delta_e,band_gap,poscar,incar,latex\n\
             Li3Nd3Te2O12,/garnets/Li3Nd3Te2O12,-2.75,4.12,POSCAR,,\n\
             Li2O,/icsd/Li2O,-2.07,,,,\n",
        );

        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(import_csv(&mut conn, &csv_path).unwrap(), 2);

        let records = db::garnet_records(&conn, "garnet").unwrap();
        assert_eq!(records.items.len(), 1);
        assert_eq!(records.items[0].band_gap, Some(4.12));

        let inputs = db::calculation_inputs(&conn, "Li3Nd3Te2O12").unwrap();
        assert_eq!(inputs[0].poscar.as_deref(), Some("Li3Nd3Te2O12\n1.0\n"));
        assert_eq!(inputs[0].incar, None);
    }

    #[test]
    fn test_import_csv_minimal_columns() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write(dir.path(), "data.csv", "name,path,delta_e\nLi2O,/icsd/Li2O,-2.07\n");

        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(import_csv(&mut conn, &csv_path).unwrap(), 1);
    }

    #[test]
    fn test_import_csv_rolls_back_on_bad_formula() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write(
            dir.path(),
            "data.csv",
            "name,path,delta_e\nLi2O,/icsd/Li2O,-2.07\nli2o,/icsd/bad,-1.0\n",
        );

        let mut conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            import_csv(&mut conn, &csv_path),
            Err(GarnetError::InvalidFormula { .. })
        ));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_import_csv_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write(
            dir.path(),
            "data.csv",
            "name,path,delta_e,band_gap,poscar\nLi2O,/icsd/Li2O,-2.07,,missing/POSCAR\n",
        );

        let mut conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            import_csv(&mut conn, &csv_path),
            Err(GarnetError::FileReadError { .. })
        ));
    }
}

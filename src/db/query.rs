//! # 数据库查询
//!
//! - 按条目路径筛选石榴石形成能记录
//! - 一次性加载形成能表中的全部相
//! - 读取某化合物的计算输入文件
//!
//! 化学式无法解析的行不会中断查询，而是记入 `skipped`。
//!
//! ## 依赖关系
//! - 被 `commands/screen.rs`, `commands/export.rs` 使用
//! - 使用 `models/` 的 GarnetRecord, Phase, CalculationInputs

use crate::error::Result;
use crate::models::{CalculationInputs, Composition, GarnetRecord, Phase};

use rusqlite::{params, Connection};

/// 查询结果及被跳过的（化学式无法解析的）条目名称
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub skipped: Vec<String>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Loaded {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl Loaded<Phase> {
    /// 组成落在 `elements` 内的相
    pub fn within(&self, elements: &[String]) -> Vec<Phase> {
        self.items
            .iter()
            .filter(|p| p.composition.is_within(elements))
            .cloned()
            .collect()
    }
}

/// 路径包含 `path_filter` 的所有形成能记录（按记录 ID 排序，区分大小写）
pub fn garnet_records(conn: &Connection, path_filter: &str) -> Result<Loaded<GarnetRecord>> {
    let mut stmt = conn.prepare(
        "SELECT f.entry_id, e.name, e.path, e.latex, f.delta_e, c.band_gap
         FROM formations f
         JOIN entries e ON e.id = f.entry_id
         LEFT JOIN calculations c ON c.id = f.calculation_id
         WHERE instr(e.path, ?1) > 0
         ORDER BY f.id",
    )?;

    let rows = stmt.query_map(params![path_filter], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, Option<f64>>(5)?,
        ))
    })?;

    let mut records = Loaded::default();
    for row in rows {
        let (entry_id, name, path, latex, delta_e, band_gap) = row?;
        let composition = match Composition::parse(&name) {
            Ok(c) => c,
            Err(_) => {
                records.skipped.push(name);
                continue;
            }
        };
        records.items.push(GarnetRecord {
            entry_id,
            name,
            path,
            composition,
            delta_e,
            band_gap,
            latex,
        });
    }

    Ok(records)
}

/// 形成能表中的全部相（每条形成能记录一个）
pub fn load_phases(conn: &Connection) -> Result<Loaded<Phase>> {
    let mut stmt = conn.prepare(
        "SELECT e.name, f.delta_e
         FROM formations f
         JOIN entries e ON e.id = f.entry_id
         ORDER BY f.id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
    })?;

    let mut phases = Loaded::default();
    for row in rows {
        let (name, delta_e) = row?;
        match Phase::from_formula(&name, delta_e) {
            Ok(phase) => phases.items.push(phase),
            Err(_) => phases.skipped.push(name),
        }
    }

    Ok(phases)
}

/// 某化合物所有计算的 POSCAR / INCAR 原始文本
pub fn calculation_inputs(conn: &Connection, name: &str) -> Result<Vec<CalculationInputs>> {
    let mut stmt = conn.prepare(
        "SELECT c.poscar, c.incar
         FROM calculations c
         JOIN entries e ON e.id = c.entry_id
         WHERE e.name = ?1
         ORDER BY c.id",
    )?;

    let rows = stmt.query_map(params![name], |row| {
        Ok(CalculationInputs {
            poscar: row.get(0)?,
            incar: row.get(1)?,
        })
    })?;

    let mut inputs = Vec::new();
    for row in rows {
        inputs.push(row?);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{init_schema, insert_calculation, insert_entry, insert_formation};

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let garnet = insert_entry(&conn, "Li3Nd3Te2O12", "/garnets/Li3Nd3Te2O12", None).unwrap();
        let calc = insert_calculation(
            &conn,
            garnet,
            Some(4.12),
            Some("Li3Nd3Te2O12\n1.0\n"),
            Some("ENCUT = 520\n"),
        )
        .unwrap();
        insert_formation(&conn, garnet, Some(calc), -2.75).unwrap();

        let li2o = insert_entry(&conn, "Li2O", "/icsd/Li2O", None).unwrap();
        insert_formation(&conn, li2o, None, -2.07).unwrap();

        let sio2 = insert_entry(&conn, "SiO2", "/icsd/SiO2", None).unwrap();
        insert_formation(&conn, sio2, None, -3.0).unwrap();

        conn
    }

    #[test]
    fn test_garnet_records_filters_by_path() {
        let conn = seeded();
        let records = garnet_records(&conn, "garnet").unwrap();

        assert!(records.skipped.is_empty());
        assert_eq!(records.items.len(), 1);
        let rec = &records.items[0];
        assert_eq!(rec.name, "Li3Nd3Te2O12");
        assert_eq!(rec.band_gap, Some(4.12));
        assert!((rec.delta_e - (-2.75)).abs() < 1e-12);
        assert_eq!(rec.space(), vec!["Li", "Nd", "Te", "O"]);
    }

    #[test]
    fn test_garnet_records_is_plain_substring_match() {
        let conn = seeded();
        assert!(garnet_records(&conn, "Garnet").unwrap().items.is_empty());
        assert!(garnet_records(&conn, "%").unwrap().items.is_empty());
        assert!(garnet_records(&conn, "g_rnet").unwrap().items.is_empty());
        assert_eq!(garnet_records(&conn, "/icsd/").unwrap().items.len(), 2);
    }

    #[test]
    fn test_load_phases_restricts_to_space() {
        let conn = seeded();
        let space: Vec<String> = ["Li", "Nd", "Te", "O"].iter().map(|s| s.to_string()).collect();
        let phases = load_phases(&conn).unwrap();

        assert_eq!(phases.items.len(), 3);
        let within = phases.within(&space);
        let names: Vec<&str> = within.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Li3Nd3Te2O12", "Li2O"]);
    }

    #[test]
    fn test_unparsable_formula_is_skipped() {
        let conn = seeded();
        let bad = insert_entry(&conn, "Fe(OH)2", "/icsd/Fe(OH)2", None).unwrap();
        insert_formation(&conn, bad, None, -1.2).unwrap();
        let bad_garnet = insert_entry(&conn, "Li3La3(Zr)2O12", "/garnets/x", None).unwrap();
        insert_formation(&conn, bad_garnet, None, -2.9).unwrap();

        let phases = load_phases(&conn).unwrap();
        assert_eq!(phases.skipped, vec!["Fe(OH)2", "Li3La3(Zr)2O12"]);
        let space = vec!["Li".to_string(), "O".to_string()];
        let names: Vec<String> = phases.within(&space).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Li2O"]);

        let records = garnet_records(&conn, "garnet").unwrap();
        assert_eq!(records.items.len(), 1);
        assert_eq!(records.skipped, vec!["Li3La3(Zr)2O12"]);
    }

    #[test]
    fn test_calculation_inputs() {
        let conn = seeded();
        let inputs = calculation_inputs(&conn, "Li3Nd3Te2O12").unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].incar.as_deref(), Some("ENCUT = 520\n"));

        assert!(calculation_inputs(&conn, "Li7La3Zr2O12").unwrap().is_empty());
    }
}

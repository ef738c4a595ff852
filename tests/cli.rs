//! 命令行端到端测试：import -> screen -> export

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const SUMMARY_HEADER: &str =
    "Garnet, formation_energy stability band_gap V_max V_min stable_phases";

fn garnetscreen(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_garnetscreen"))
        .args(args)
        .arg("--database")
        .arg(db)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn seed(dir: &Path) -> std::path::PathBuf {
    fs::write(dir.join("POSCAR"), "Li3X5O12\n1.0\n").unwrap();
    fs::write(dir.join("INCAR"), "ENCUT = 520\n").unwrap();
    let csv = dir.join("phases.csv");
    fs::write(
        &csv,
        "name,path,delta_e,band_gap,poscar,incar,latex\n\
         XO,/icsd/XO,-1.5,,,,\n\
         Li2O,/icsd/Li2O,-2.0,5.0,,,\n\
         Li3X5O12,/garnets/Li3X5O12,-1.4,4.0,POSCAR,INCAR,\n\
         Li3Y5O12,/garnets/Li3Y5O12,0.5,,,,\n",
    )
    .unwrap();

    let db = dir.join("test.sqlite");
    let out = garnetscreen(&db, &["import", csv.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    db
}

#[test]
fn test_screen_stdout_holds_only_summary() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed(dir.path());
    let plots = dir.path().join("plots");

    let out = garnetscreen(
        &db,
        &["screen", "--verbose", "--output-dir", plots.to_str().unwrap()],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout was:\n{}", stdout);
    assert_eq!(lines[0], SUMMARY_HEADER);
    assert!(lines[1].starts_with("Li3X5O12 -1.4 "));
    assert!(lines[1].contains(" 4.0 "));
    assert!(lines[1].ends_with("[Li3X5O12]"));

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("[OK]"));
    assert!(stderr.contains("[SKIP] Li3Y5O12"));

    assert!(plots.join("Li3X5O12.png").is_file());
    assert!(!plots.join("Li3Y5O12.png").exists());
}

#[test]
fn test_export_prints_poscar_then_incar() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed(dir.path());

    let out = garnetscreen(&db, &["export", "Li3X5O12"]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "Li3X5O12\n1.0\nENCUT = 520\n"
    );

    let missing = garnetscreen(&db, &["export", "Li7La3Zr2O12"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("[ERR]"));
}

#[test]
fn test_screen_missing_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = garnetscreen(&dir.path().join("absent.sqlite"), &["screen"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

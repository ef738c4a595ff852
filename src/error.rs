//! # 统一错误处理模块
//!
//! 定义 garnetscreen 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// garnetscreen 统一错误类型
#[derive(Error, Debug)]
pub enum GarnetError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid chemical formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 数据库错误
    // ─────────────────────────────────────────────────────────────
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database schema {found} incompatible with expected {expected}")]
    SchemaVersion { found: i64, expected: i64 },

    #[error("No entry named '{name}' in the database")]
    EntryNotFound { name: String },

    // ─────────────────────────────────────────────────────────────
    // 热力学计算错误
    // ─────────────────────────────────────────────────────────────
    #[error("Linear program is infeasible: {0}")]
    Infeasible(String),

    #[error("Linear program is unbounded")]
    Unbounded,

    #[error("Linear program dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Composition {composition} lies outside the phase space {space}")]
    OutsidePhaseSpace { composition: String, space: String },

    #[error("Voltage window at x = {reference_x} is not bracketed by the hull slice of {compound}")]
    UnbracketedWindow { compound: String, reference_x: f64 },

    // ─────────────────────────────────────────────────────────────
    // 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("Plotting failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GarnetError>;

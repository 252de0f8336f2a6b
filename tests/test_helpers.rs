// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、临时 CSV 文件、行记录构造
// ==========================================

#![allow(dead_code)]

use data_alchemist::db::open_sqlite_connection;
use data_alchemist::RawRow;
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    // 打开即建表
    open_sqlite_connection(&db_path)?;

    Ok((temp_file, db_path))
}

/// 在目录中写出 CSV 文件
pub fn write_csv(dir: &Path, file_name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(file_name);
    let mut file = std::fs::File::create(&path).expect("create csv");
    for line in lines {
        writeln!(file, "{}", line).expect("write csv line");
    }
    path
}

/// 由列名/值对构造行记录
pub fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn client(id: &str, priority: &str, requested: &str) -> RawRow {
    row(&[
        ("ClientID", id),
        ("PriorityLevel", priority),
        ("RequestedTaskIDs", requested),
    ])
}

pub fn worker(id: &str, skills: &str, slots: &str, max_load: &str) -> RawRow {
    row(&[
        ("WorkerID", id),
        ("Skills", skills),
        ("AvailableSlots", slots),
        ("MaxLoadPerPhase", max_load),
    ])
}

pub fn task(id: &str, duration: &str, skills: &str, phases: &str, max_concurrent: &str) -> RawRow {
    row(&[
        ("TaskID", id),
        ("Duration", duration),
        ("RequiredSkills", skills),
        ("PreferredPhases", phases),
        ("MaxConcurrent", max_concurrent),
    ])
}

/// 一组没有任何问题的数据集
pub fn clean_workspace() -> (Vec<RawRow>, Vec<RawRow>, Vec<RawRow>) {
    let clients = vec![client("C1", "3", "T1,T2"), client("C2", "5", "T2")];
    let workers = vec![
        worker("W1", "welding,painting", "[1,2,3]", "2"),
        worker("W2", "welding", "1-3", "1"),
    ];
    let tasks = vec![
        task("T1", "1", "welding", "[1,2]", "2"),
        task("T2", "1", "painting", "3", "1"),
    ];
    (clients, workers, tasks)
}

// ==========================================
// 排产数据集校验 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 原始行 (列名 → 字符串), 保持表头列顺序
// 规则:
// - 表头 TRIM, 单元格保持原值
// - 完全空白的行跳过
// - 允许行长度不一致, 多出的列丢弃, 缺少的列不补
// ==========================================

use crate::domain::records::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 数据行（不含表头）
    /// - Err: 文件不存在 / 格式不支持 / 解析失败
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_lowercase(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn build_row<I>(headers: &[String], values: I) -> Option<RawRow>
where
    I: Iterator<Item = String>,
{
    // 无表头的列丢弃
    let row: RawRow = headers
        .iter()
        .zip(values)
        .filter(|(h, _)| !h.is_empty())
        .map(|(h, v)| (h.clone(), v))
        .collect();

    // 跳过完全空白的行
    if row.values().all(|v| v.trim().is_empty()) {
        return None;
    }
    Some(row)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let path = file_path;
        ensure_exists(path)?;

        let ext = extension_lowercase(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(row) = build_row(&headers, record.iter().map(str::to_string)) {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读取第一个工作表, 首行为表头
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let path = file_path;
        ensure_exists(path)?;

        let ext = extension_lowercase(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            // 空工作表视为空数据集
            return Ok(Vec::new());
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let records = rows
            .filter_map(|data_row| build_row(&headers, data_row.iter().map(|c| c.to_string())))
            .collect();

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();

        match extension_lowercase(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = csv_file(&[
            " ClientID ,PriorityLevel,RequestedTaskIDs",
            "C1,3,\"T1,T2\"",
            "C2,1,T3",
        ]);

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("ClientID"), Some(&"C1".to_string()));
        assert_eq!(records[0].get("RequestedTaskIDs"), Some(&"T1,T2".to_string()));
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["ClientID", "PriorityLevel", "RequestedTaskIDs"]);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_records(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = csv_file(&["WorkerID,Skills", "W1,a", ",", "W2,b"]);

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_csv_parser_keeps_cell_whitespace() {
        let temp_file = csv_file(&["TaskID,Duration", " T1 ,2"]);

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records[0].get("TaskID"), Some(&" T1 ".to_string()));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            UniversalFileParser.parse(temp_file.path()),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }
}

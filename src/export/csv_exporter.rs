// ==========================================
// 排产数据集校验 - CSV 导出
// ==========================================
// 格式:
// - 表头取首行的列名（保持顺序）
// - 所有字段加双引号, 内部双引号加倍
// - 行尾 CRLF
// - 后续行缺少的列输出空串, 首行没有的列不输出
// ==========================================

use crate::domain::records::RawRow;
use crate::domain::session::Session;
use crate::domain::types::EntityKind;
use crate::export::error::{ExportError, ExportResult};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct CsvExporter;

impl CsvExporter {
    /// 写出单个数据集到任意 writer
    pub fn write_rows<W: Write>(
        &self,
        entity: EntityKind,
        rows: &[RawRow],
        writer: W,
    ) -> ExportResult<()> {
        let first = rows.first().ok_or(ExportError::EmptyDataset(entity))?;
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();

        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::CRLF)
            .from_writer(writer);

        wtr.write_record(&headers)?;
        for row in rows {
            wtr.write_record(
                headers
                    .iter()
                    .map(|h| row.get(*h).map(String::as_str).unwrap_or("")),
            )?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// 导出为 CSV 字符串
    pub fn to_csv_string(&self, entity: EntityKind, rows: &[RawRow]) -> ExportResult<String> {
        let mut buf = Vec::new();
        self.write_rows(entity, rows, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// 导出为文件
    pub fn export_file(
        &self,
        entity: EntityKind,
        rows: &[RawRow],
        path: &Path,
    ) -> ExportResult<()> {
        let file = fs::File::create(path)?;
        self.write_rows(entity, rows, file)?;
        info!(entity = %entity, rows = rows.len(), file = %path.display(), "CSV 导出完成");
        Ok(())
    }

    /// 导出整个会话的三个数据集到目录
    ///
    /// # 返回
    /// - 写出的文件路径（clients.csv / workers.csv / tasks.csv, 空数据集跳过）
    pub fn export_workspace(&self, session: &Session, dir: &Path) -> ExportResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for entity in EntityKind::ALL {
            let rows = session.rows(entity);
            if rows.is_empty() {
                warn!(entity = %entity, "数据集为空，跳过导出");
                continue;
            }

            let path = dir.join(format!("{}.csv", entity.as_str()));
            self.export_file(entity, rows, &path)?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_quotes_every_field_with_crlf() {
        let rows = vec![
            row(&[("TaskID", "T1"), ("Name", "say \"hi\"")]),
            row(&[("TaskID", "T2")]),
        ];

        let csv = CsvExporter.to_csv_string(EntityKind::Tasks, &rows).unwrap();

        assert_eq!(
            csv,
            "\"TaskID\",\"Name\"\r\n\"T1\",\"say \"\"hi\"\"\"\r\n\"T2\",\"\"\r\n"
        );
    }

    #[test]
    fn test_empty_dataset_is_error() {
        assert!(matches!(
            CsvExporter.to_csv_string(EntityKind::Clients, &[]),
            Err(ExportError::EmptyDataset(EntityKind::Clients))
        ));
    }
}

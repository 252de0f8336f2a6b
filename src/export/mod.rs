// ==========================================
// 排产数据集校验 - 导出层
// ==========================================
// 职责: 数据集 → CSV, 规则集/会话 → JSON
// ==========================================

pub mod csv_exporter;
pub mod error;
pub mod rules_exporter;

pub use csv_exporter::CsvExporter;
pub use error::{ExportError, ExportResult};
pub use rules_exporter::{RulesExporter, RULES_FILE_NAME, SESSION_FILE_NAME};

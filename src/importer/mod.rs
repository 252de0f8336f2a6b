// ==========================================
// 排产数据集校验 - 导入层
// ==========================================
// 职责: 外部文件 → 原始行记录
// 支持: Excel, CSV
// ==========================================

pub mod entity_detector;
pub mod error;
pub mod file_parser;
pub mod workspace_importer;

// 重导出核心类型
pub use entity_detector::EntityDetector;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use workspace_importer::{WorkspaceImporter, WorkspaceImporterImpl};

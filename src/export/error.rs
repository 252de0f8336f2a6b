// ==========================================
// 排产数据集校验 - 导出模块错误类型
// ==========================================

use crate::domain::types::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("没有可导出的数据: {0}")]
    EmptyDataset(EntityKind),

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(#[from] csv::Error),

    #[error("文件写入失败: {0}")]
    FileWriteError(#[from] std::io::Error),

    #[error("JSON 序列化失败: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;

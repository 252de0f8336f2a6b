// ==========================================
// 排产数据集校验 - API层错误类型
// ==========================================
// 职责: 汇总各层错误, 转换为面向使用者的错误消息
// ==========================================

use crate::domain::rule::RuleError;
use crate::domain::session::SessionError;
use crate::engine::task_query::TaskQueryError;
use crate::export::error::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("规则录入失败: {0}")]
    RuleRejected(#[from] RuleError),

    #[error("检索条件错误: {0}")]
    InvalidQuery(#[from] TaskQueryError),

    #[error("会话文件错误: {0}")]
    InvalidSession(#[from] SessionError),

    // ==========================================
    // 适配层错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(#[from] ImportError),

    #[error("导出失败: {0}")]
    ExportError(#[from] ExportError),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::CorruptPayload(e) => ApiError::InvalidSession(e),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::TimestampParseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

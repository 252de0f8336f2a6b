// ==========================================
// 排产数据集校验 - API 层
// ==========================================
// 职责: 面向命令行的业务接口, 组合导入 / 引擎 / 仓储 / 导出
// ==========================================

pub mod error;
pub mod workspace_api;

pub use error::{ApiError, ApiResult};
pub use workspace_api::{FailedFile, ImportOutcome, ImportedFile, WorkspaceApi};

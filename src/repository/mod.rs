// ==========================================
// 排产数据集校验 - 仓储层
// ==========================================
// 职责: 会话快照的 SQLite 持久化
// 红线: 仓储不含校验逻辑
// ==========================================

pub mod error;
pub mod session_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use session_repo::{SessionRepository, SessionSummary};

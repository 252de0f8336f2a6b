// ==========================================
// 排产数据集校验 - 领域模型层
// ==========================================
// 职责: 定义行记录、强类型实体、规则、校验结果、会话
// 红线: 不含数据访问逻辑, 不含校验逻辑
// ==========================================

pub mod finding;
pub mod records;
pub mod rule;
pub mod session;
pub mod types;

// 重导出核心类型
pub use finding::{summarize, EntityCounts, Finding, ValidationSummary};
pub use records::{
    columns, ClientRecord, PhaseDecodeError, PhaseList, RawRow, TaskRecord, WorkerRecord,
};
pub use rule::{PriorityWeights, Rule, RuleError, RuleSet};
pub use session::{ImportedDataset, Session, SessionError, SessionResult};
pub use types::{EntityKind, Phase, RowRef, Severity};

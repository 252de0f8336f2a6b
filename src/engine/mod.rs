// ==========================================
// 排产数据集校验 - 引擎层
// ==========================================
// 职责: 阶段解码、行解析、检查项执行、任务检索、规则建议
// 红线: 引擎不做 IO, 所有结果必须带 message
// ==========================================

pub mod check;
pub mod corun_cycle;
pub mod coverage_checks;
pub mod phase_decoder;
pub mod record_parser;
pub mod rule_suggester;
pub mod structure_checks;
pub mod task_query;
pub mod validator;

// 重导出核心引擎
pub use check::{CheckContext, DatasetCheck};
pub use corun_cycle::{CoRunCycleCheck, CoRunGraph};
pub use coverage_checks::{aggregate_phase_load, PhaseLoad};
pub use phase_decoder::{decode_phases, PhaseDecoder, DEFAULT_MAX_RANGE_SPAN};
pub use record_parser::{ParsedWorkspace, RecordParser};
pub use rule_suggester::{suggest_co_runs, RuleSuggester};
pub use structure_checks::required_columns;
pub use task_query::{Comparison, TaskQuery, TaskQueryError};
pub use validator::{validate, ValidationEngine, ValidationInput, ValidationReport};

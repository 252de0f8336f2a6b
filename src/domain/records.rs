// ==========================================
// 排产数据集校验 - 行记录与强类型记录
// ==========================================
// 职责: 原始行 (列名 → 字符串) 与三类实体的强类型中间结构
// 生命周期: 仅在一次校验调用内
// ==========================================

use crate::domain::types::Phase;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 原始行记录（保持列顺序）
pub type RawRow = IndexMap<String, String>;

// ==========================================
// 列名常量
// ==========================================
pub mod columns {
    pub const CLIENT_ID: &str = "ClientID";
    pub const PRIORITY_LEVEL: &str = "PriorityLevel";
    pub const REQUESTED_TASK_IDS: &str = "RequestedTaskIDs";

    pub const WORKER_ID: &str = "WorkerID";
    pub const SKILLS: &str = "Skills";
    pub const AVAILABLE_SLOTS: &str = "AvailableSlots";
    pub const MAX_LOAD_PER_PHASE: &str = "MaxLoadPerPhase";

    pub const TASK_ID: &str = "TaskID";
    pub const DURATION: &str = "Duration";
    pub const REQUIRED_SKILLS: &str = "RequiredSkills";
    pub const PREFERRED_PHASES: &str = "PreferredPhases";
    pub const MAX_CONCURRENT: &str = "MaxConcurrent";
}

// ==========================================
// PhaseDecodeError - 阶段列表解码失败原因
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhaseDecodeError {
    #[error("field is missing")]
    Missing,

    #[error("invalid JSON integer array: {0}")]
    InvalidJson(String),

    #[error("invalid range '{0}', expected start-end")]
    InvalidRange(String),

    #[error("range {start}-{end} is reversed")]
    ReversedRange { start: Phase, end: Phase },

    #[error("range {start}-{end} spans more than {max} phases")]
    RangeTooWide { start: Phase, end: Phase, max: usize },

    #[error("'{0}' is not an integer")]
    InvalidToken(String),
}

// ==========================================
// PhaseList - 解码后的阶段列表
// ==========================================
// 解码失败的列表对后续检查视为空列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseList {
    Decoded(Vec<Phase>),
    Malformed(PhaseDecodeError),
}

impl PhaseList {
    pub fn phases(&self) -> &[Phase] {
        match self {
            PhaseList::Decoded(phases) => phases,
            PhaseList::Malformed(_) => &[],
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, PhaseList::Malformed(_))
    }

    pub fn contains(&self, phase: Phase) -> bool {
        self.phases().contains(&phase)
    }
}

impl From<Result<Vec<Phase>, PhaseDecodeError>> for PhaseList {
    fn from(value: Result<Vec<Phase>, PhaseDecodeError>) -> Self {
        match value {
            Ok(phases) => PhaseList::Decoded(phases),
            Err(e) => PhaseList::Malformed(e),
        }
    }
}

// ==========================================
// ClientRecord - 客户
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub row_number: usize,               // 1 起始行号
    pub client_id: Option<String>,       // 原值, 不做标准化
    pub priority_level: Option<i64>,     // 期望 1-5
    pub requested_task_ids: Vec<String>, // 已 TRIM, 已去空
}

// ==========================================
// WorkerRecord - 工人
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRecord {
    pub row_number: usize,
    pub worker_id: Option<String>,
    pub skills: Vec<String>, // 已 TRIM, 保留大小写
    pub available_slots: PhaseList,
    pub max_load_per_phase: Option<i64>,
}

impl WorkerRecord {
    /// 技能集合（小写, 用于大小写无关比较）
    pub fn skills_lowercase(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.to_lowercase()).collect()
    }
}

// ==========================================
// TaskRecord - 任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub row_number: usize,
    pub task_id: Option<String>,
    pub duration: Option<i64>,
    pub required_skills: Vec<String>,
    pub preferred_phases: PhaseList,
    pub max_concurrent: Option<i64>,
}

impl TaskRecord {
    /// 缺省并发数
    pub const DEFAULT_MAX_CONCURRENT: i64 = 1;

    /// 有效并发上限（缺失或无法解析时为 1）
    pub fn effective_max_concurrent(&self) -> i64 {
        self.max_concurrent.unwrap_or(Self::DEFAULT_MAX_CONCURRENT)
    }
}

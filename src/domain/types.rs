// ==========================================
// 排产数据集校验 - 领域类型定义
// ==========================================
// 职责: 严重级别 / 数据集类型 / 行定位
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 阶段编号（排产时间槽）
pub type Phase = i64;

// ==========================================
// 严重级别 (Severity)
// ==========================================
// 红线: 只有两级, error 阻断排产, warning 仅提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,   // 结构性/引用性错误
    Warning, // 可行但有风险
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

// ==========================================
// 数据集类型 (EntityKind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Clients,
    Workers,
    Tasks,
}

impl EntityKind {
    /// 全部数据集（固定顺序）
    pub const ALL: [EntityKind; 3] = [EntityKind::Clients, EntityKind::Workers, EntityKind::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Clients => "clients",
            EntityKind::Workers => "workers",
            EntityKind::Tasks => "tasks",
        }
    }

    /// 主键列名
    pub fn id_column(&self) -> &'static str {
        match self {
            EntityKind::Clients => "ClientID",
            EntityKind::Workers => "WorkerID",
            EntityKind::Tasks => "TaskID",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 行定位 (RowRef)
// ==========================================
// 序列化格式: 行号为 1 起始整数, 数据集级别为 -1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum RowRef {
    DatasetLevel,
    Row(usize),
}

impl RowRef {
    /// 由 0 起始下标构造 1 起始行号
    pub fn from_index(idx: usize) -> Self {
        RowRef::Row(idx + 1)
    }

    pub fn row_number(&self) -> Option<usize> {
        match self {
            RowRef::DatasetLevel => None,
            RowRef::Row(n) => Some(*n),
        }
    }
}

impl From<RowRef> for i64 {
    fn from(value: RowRef) -> Self {
        match value {
            RowRef::DatasetLevel => -1,
            RowRef::Row(n) => n as i64,
        }
    }
}

impl TryFrom<i64> for RowRef {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(RowRef::DatasetLevel),
            n if n >= 1 => Ok(RowRef::Row(n as usize)),
            n => Err(format!("非法行号: {}", n)),
        }
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRef::DatasetLevel => write!(f, "dataset-level"),
            RowRef::Row(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_ref_serde() {
        assert_eq!(serde_json::to_string(&RowRef::DatasetLevel).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&RowRef::Row(2)).unwrap(), "2");

        let parsed: RowRef = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, RowRef::Row(3));
        assert!(serde_json::from_str::<RowRef>("0").is_err());
    }

    #[test]
    fn test_entity_kind_serde() {
        assert_eq!(serde_json::to_string(&EntityKind::Workers).unwrap(), "\"workers\"");
        assert_eq!(EntityKind::Tasks.id_column(), "TaskID");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}

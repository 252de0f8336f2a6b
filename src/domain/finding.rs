// ==========================================
// 排产数据集校验 - 校验结果 (Finding) 与汇总
// ==========================================
// 职责: 单条校验结果值对象 + 按数据集汇总 error/warning 数量
// 红线: 汇总仅用于展示, 不参与流程控制
// ==========================================

use crate::domain::types::{EntityKind, RowRef, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Finding - 单条校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub severity: Severity,  // 严重级别
    pub entity: EntityKind,  // 所属数据集
    pub row_index: RowRef,   // 行号（1 起始）或数据集级别
    pub column: String,      // 相关列
    pub message: String,     // 描述
}

impl Finding {
    pub fn error(
        entity: EntityKind,
        row_index: RowRef,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            entity,
            row_index,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn warning(
        entity: EntityKind,
        row_index: RowRef,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            entity,
            row_index,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} row {} ({}): {}",
            self.severity, self.entity, self.row_index, self.column, self.message
        )
    }
}

// ==========================================
// EntityCounts - 单个数据集的计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub error: usize,
    pub warning: usize,
}

// ==========================================
// ValidationSummary - 按数据集汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub clients: EntityCounts,
    pub workers: EntityCounts,
    pub tasks: EntityCounts,
}

impl ValidationSummary {
    /// 将校验结果列表归约为按数据集的计数
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for finding in findings {
            let counts = summary.counts_mut(finding.entity);
            match finding.severity {
                Severity::Error => counts.error += 1,
                Severity::Warning => counts.warning += 1,
            }
        }
        summary
    }

    pub fn counts(&self, entity: EntityKind) -> EntityCounts {
        match entity {
            EntityKind::Clients => self.clients,
            EntityKind::Workers => self.workers,
            EntityKind::Tasks => self.tasks,
        }
    }

    fn counts_mut(&mut self, entity: EntityKind) -> &mut EntityCounts {
        match entity {
            EntityKind::Clients => &mut self.clients,
            EntityKind::Workers => &mut self.workers,
            EntityKind::Tasks => &mut self.tasks,
        }
    }

    pub fn total_errors(&self) -> usize {
        self.clients.error + self.workers.error + self.tasks.error
    }

    pub fn total_warnings(&self) -> usize {
        self.clients.warning + self.workers.warning + self.tasks.warning
    }
}

/// 汇总校验结果（纯函数）
pub fn summarize(findings: &[Finding]) -> ValidationSummary {
    ValidationSummary::from_findings(findings)
}

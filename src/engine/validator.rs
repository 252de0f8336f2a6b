// ==========================================
// 排产数据集校验 - 校验引擎
// ==========================================
// 职责: 解析三类数据集 → 依次执行全部检查项 → 汇总结果
// 输入: clients / workers / tasks 原始行 + 规则列表
// 输出: 按检查项顺序追加的 Finding 列表
// 红线: 纯函数, 不修改输入, 不短路, 不截断
// ==========================================

use crate::config::ValidationConfig;
use crate::domain::finding::{Finding, ValidationSummary};
use crate::domain::records::RawRow;
use crate::domain::rule::Rule;
use crate::engine::check::{CheckContext, DatasetCheck};
use crate::engine::corun_cycle::CoRunCycleCheck;
use crate::engine::coverage_checks::{
    ConcurrencyFeasibilityCheck, PhaseCapacityCheck, PhaseFitCheck, SkillCoverageCheck,
};
use crate::engine::phase_decoder::PhaseDecoder;
use crate::engine::record_parser::RecordParser;
use crate::engine::structure_checks::{
    IdentifierUniquenessCheck, SchemaPresenceCheck, SlotListCheck, TaskReferenceCheck,
    WorkerOverloadCheck,
};
use crate::domain::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

// ==========================================
// ValidationInput - 校验输入
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub clients: &'a [RawRow],
    pub workers: &'a [RawRow],
    pub tasks: &'a [RawRow],
    pub rules: &'a [Rule],
}

// ==========================================
// ValidationReport - 结果 + 汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.summary.total_errors() > 0
    }
}

// 每行一条结果, 末尾按数据集汇总
impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{}", finding)?;
        }
        for entity in EntityKind::ALL {
            let counts = self.summary.counts(entity);
            writeln!(
                f,
                "{}: {} error(s), {} warning(s)",
                entity, counts.error, counts.warning
            )?;
        }
        Ok(())
    }
}

// ==========================================
// ValidationEngine - 校验引擎
// ==========================================
pub struct ValidationEngine {
    parser: RecordParser,
    checks: Vec<Box<dyn DatasetCheck>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl ValidationEngine {
    /// 创建校验引擎
    ///
    /// # 检查顺序
    /// (a) 必填列 → (b) 主键唯一 → (c) 时段格式 → (d) 任务引用 → (e) 工人负载
    /// → (f) 技能覆盖 → (g) coRun 环 → (h) 阶段适配 → (i) 阶段产能 → (j) 并发可行
    pub fn new(config: &ValidationConfig) -> Self {
        let decoder = PhaseDecoder::new(config.max_phase_range_span);
        let checks: Vec<Box<dyn DatasetCheck>> = vec![
            Box::new(SchemaPresenceCheck),
            Box::new(IdentifierUniquenessCheck),
            Box::new(SlotListCheck),
            Box::new(TaskReferenceCheck),
            Box::new(WorkerOverloadCheck),
            Box::new(SkillCoverageCheck),
            Box::new(CoRunCycleCheck),
            Box::new(PhaseFitCheck),
            Box::new(PhaseCapacityCheck),
            Box::new(ConcurrencyFeasibilityCheck),
        ];

        Self {
            parser: RecordParser::new(decoder),
            checks,
        }
    }

    /// 执行全部检查
    #[instrument(
        skip(self, input),
        fields(
            clients = input.clients.len(),
            workers = input.workers.len(),
            tasks = input.tasks.len(),
            rules = input.rules.len()
        )
    )]
    pub fn validate(&self, input: ValidationInput<'_>) -> Vec<Finding> {
        let parsed = self
            .parser
            .parse_workspace(input.clients, input.workers, input.tasks);

        let ctx = CheckContext {
            raw_clients: input.clients,
            raw_workers: input.workers,
            raw_tasks: input.tasks,
            rules: input.rules,
            parsed: &parsed,
        };

        let mut findings = Vec::new();
        for check in &self.checks {
            let mut found = check.run(&ctx);
            debug!(check = check.name(), count = found.len(), "检查项完成");
            findings.append(&mut found);
        }

        let summary = ValidationSummary::from_findings(&findings);
        info!(
            errors = summary.total_errors(),
            warnings = summary.total_warnings(),
            "数据集校验完成"
        );

        findings
    }

    /// 执行全部检查并汇总
    pub fn validate_with_summary(&self, input: ValidationInput<'_>) -> ValidationReport {
        let findings = self.validate(input);
        let summary = ValidationSummary::from_findings(&findings);
        ValidationReport { findings, summary }
    }
}

/// 使用默认配置校验（便捷入口）
pub fn validate(
    clients: &[RawRow],
    workers: &[RawRow],
    tasks: &[RawRow],
    rules: &[Rule],
) -> Vec<Finding> {
    ValidationEngine::default().validate(ValidationInput {
        clients,
        workers,
        tasks,
        rules,
    })
}

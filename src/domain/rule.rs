// ==========================================
// 排产数据集校验 - 排产规则与优先级权重
// ==========================================
// 职责: 规则闭合和类型 (coRun / dependency) + 规则集 + 录入守卫
// 红线: 规则只按值引用任务, 引用是否存在由校验引擎复核
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

// ==========================================
// Rule - 排产规则
// ==========================================
// 序列化格式: {"type":"coRun","tasks":[..]} / {"type":"dependency","before":..,"after":..}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Rule {
    /// 一组任务必须同时执行
    #[serde(rename = "coRun")]
    CoRun { tasks: Vec<String> },

    /// after 不得早于 before 完成前开始
    #[serde(rename = "dependency")]
    Dependency { before: String, after: String },
}

impl Rule {
    pub fn co_run<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::CoRun {
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dependency(before: impl Into<String>, after: impl Into<String>) -> Self {
        Rule::Dependency {
            before: before.into(),
            after: after.into(),
        }
    }

    /// 规则引用的全部任务号
    pub fn task_ids(&self) -> Vec<&str> {
        match self {
            Rule::CoRun { tasks } => tasks.iter().map(String::as_str).collect(),
            Rule::Dependency { before, after } => vec![before.as_str(), after.as_str()],
        }
    }
}

// ==========================================
// RuleError - 规则录入错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("规则引用了不存在的任务: {0}")]
    UnknownTask(String),

    #[error("coRun 规则至少需要两个不同任务, 实际 {0} 个")]
    TooFewCoRunTasks(usize),

    #[error("dependency 规则不能依赖自身: {0}")]
    SelfDependency(String),

    #[error("规则下标越界: {index} (共 {len} 条)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("权重 {field} 超出范围 [0, {max}]: {value}")]
    WeightOutOfRange { field: String, value: u8, max: u8 },
}

// ==========================================
// PriorityWeights - 优先级权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityWeights {
    pub priority_level_weight: u8,
    pub fairness_weight: u8,
    pub fulfillment_weight: u8,
}

impl PriorityWeights {
    /// 单项权重上限
    pub const MAX_WEIGHT: u8 = 10;

    /// 校验每项权重均在 [0, 10]
    pub fn validate(&self) -> Result<(), RuleError> {
        let fields = [
            ("priorityLevelWeight", self.priority_level_weight),
            ("fairnessWeight", self.fairness_weight),
            ("fulfillmentWeight", self.fulfillment_weight),
        ];
        for (field, value) in fields {
            if value > Self::MAX_WEIGHT {
                return Err(RuleError::WeightOutOfRange {
                    field: field.to_string(),
                    value,
                    max: Self::MAX_WEIGHT,
                });
            }
        }
        Ok(())
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            priority_level_weight: 3,
            fairness_weight: 2,
            fulfillment_weight: 5,
        }
    }
}

// ==========================================
// RuleSet - 规则集
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub priorities: PriorityWeights,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>, priorities: PriorityWeights) -> Self {
        Self { rules, priorities }
    }

    /// 录入一条规则（录入守卫）
    ///
    /// # 规则
    /// - coRun: 去重后至少两个任务, 且全部存在
    /// - dependency: before/after 均存在且不相同
    pub fn add_rule(&mut self, rule: Rule, known_task_ids: &HashSet<&str>) -> Result<(), RuleError> {
        match &rule {
            Rule::CoRun { tasks } => {
                let distinct: HashSet<&str> = tasks.iter().map(String::as_str).collect();
                if distinct.len() < 2 {
                    return Err(RuleError::TooFewCoRunTasks(distinct.len()));
                }
            }
            Rule::Dependency { before, after } => {
                if before == after {
                    return Err(RuleError::SelfDependency(before.clone()));
                }
            }
        }

        if let Some(unknown) = rule.task_ids().into_iter().find(|id| !known_task_ids.contains(id)) {
            return Err(RuleError::UnknownTask(unknown.to_string()));
        }

        tracing::debug!(rule = ?rule, "规则已录入");
        self.rules.push(rule);
        Ok(())
    }

    /// 按下标删除规则
    pub fn remove_rule(&mut self, index: usize) -> Result<Rule, RuleError> {
        if index >= self.rules.len() {
            return Err(RuleError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        Ok(self.rules.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

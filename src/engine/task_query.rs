// ==========================================
// 排产数据集校验 - 任务检索
// ==========================================
// 支持的条件（大小写无关, 逗号分隔可组合, 任一条件命中即保留）:
// - skill <名称>        RequiredSkills 包含该子串
// - duration (>|<|=) N  Duration 整数比较
// - phase N             PreferredPhases 包含阶段 N
// ==========================================

use crate::domain::records::{columns, RawRow};
use crate::domain::types::Phase;
use crate::engine::phase_decoder::decode_phases;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskQueryError {
    #[error("查询为空")]
    Empty,

    #[error("无法识别的查询条件: {0}")]
    Unrecognized(String),
}

pub type TaskQueryResult<T> = Result<T, TaskQueryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
}

impl Comparison {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Comparison::Greater),
            "<" => Some(Comparison::Less),
            "=" => Some(Comparison::Equal),
            _ => None,
        }
    }

    fn matches(self, left: i64, right: i64) -> bool {
        match self {
            Comparison::Greater => left > right,
            Comparison::Less => left < right,
            Comparison::Equal => left == right,
        }
    }
}

// ==========================================
// TaskQuery - 已解析的检索条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub skill: Option<String>, // 小写
    pub duration: Option<(Comparison, i64)>,
    pub phase: Option<Phase>,
}

static SKILL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"skill\s+([^,]+)").expect("valid regex"));
static DURATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"duration\s*(>|<|=)\s*(\d+)").expect("valid regex"));
static PHASE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"phase\s*(\d+)").expect("valid regex"));

impl TaskQuery {
    /// 解析检索文本
    ///
    /// # 示例
    /// `skill welding, duration > 2, phase 1`
    pub fn parse(text: &str) -> TaskQueryResult<Self> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return Err(TaskQueryError::Empty);
        }

        let mut query = TaskQuery::default();

        if let Some(caps) = SKILL_PATTERN.captures(&lower) {
            let skill = caps[1].trim();
            if !skill.is_empty() {
                query.skill = Some(skill.to_string());
            }
        }

        if let Some(caps) = DURATION_PATTERN.captures(&lower) {
            let op = Comparison::from_symbol(&caps[1]);
            let value = caps[2].parse::<i64>().ok();
            if let (Some(op), Some(value)) = (op, value) {
                query.duration = Some((op, value));
            }
        }

        if let Some(caps) = PHASE_PATTERN.captures(&lower) {
            query.phase = caps[1].parse::<Phase>().ok();
        }

        if query.is_empty() {
            return Err(TaskQueryError::Unrecognized(text.trim().to_string()));
        }
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.skill.is_none() && self.duration.is_none() && self.phase.is_none()
    }

    /// 单行是否命中任一条件
    pub fn matches(&self, row: &RawRow) -> bool {
        let skill_hit = self.skill.as_deref().is_some_and(|skill| {
            row.get(columns::REQUIRED_SKILLS)
                .is_some_and(|v| v.to_lowercase().contains(skill))
        });

        let duration_hit = self.duration.is_some_and(|(op, value)| {
            row.get(columns::DURATION)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .is_some_and(|d| op.matches(d, value))
        });

        let phase_hit = self.phase.is_some_and(|phase| {
            row.get(columns::PREFERRED_PHASES)
                .is_some_and(|v| decode_phases(v).contains(&phase))
        });

        skill_hit || duration_hit || phase_hit
    }

    /// 过滤任务行（保持原顺序）
    pub fn filter<'a>(&self, tasks: &'a [RawRow]) -> Vec<&'a RawRow> {
        tasks.iter().filter(|row| self.matches(row)).collect()
    }
}

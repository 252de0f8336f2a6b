// ==========================================
// 排产数据集校验 - 会话 (Session)
// ==========================================
// 职责: 三类数据集 + 规则集 + 权重的快照, 及 JSON 交换格式
// 交换格式: {"clients":[..],"workers":[..],"tasks":[..],"rules":[..],"priorities":{..}}
// ==========================================

use crate::domain::records::RawRow;
use crate::domain::rule::{PriorityWeights, Rule, RuleSet};
use crate::domain::types::EntityKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

// ==========================================
// SessionError - 会话解析错误
// ==========================================
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("会话文件 JSON 解析失败: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("会话文件缺少数据集: {0}")]
    MissingCollection(EntityKind),

    #[error("会话文件结构错误: {0}")]
    InvalidShape(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

// ==========================================
// ImportedDataset - 单个文件的导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedDataset {
    pub entity: EntityKind,
    pub file_name: String,
    pub rows: Vec<RawRow>,
}

// ==========================================
// Session - 会话快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub clients: Vec<RawRow>,
    pub workers: Vec<RawRow>,
    pub tasks: Vec<RawRow>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub priorities: PriorityWeights,
}

impl Session {
    pub fn rows(&self, entity: EntityKind) -> &[RawRow] {
        match entity {
            EntityKind::Clients => &self.clients,
            EntityKind::Workers => &self.workers,
            EntityKind::Tasks => &self.tasks,
        }
    }

    /// 以导入结果整体替换某个数据集
    pub fn replace_rows(&mut self, entity: EntityKind, rows: Vec<RawRow>) {
        match entity {
            EntityKind::Clients => self.clients = rows,
            EntityKind::Workers => self.workers = rows,
            EntityKind::Tasks => self.tasks = rows,
        }
    }

    /// 应用导入结果（整体替换对应数据集）
    pub fn apply(&mut self, dataset: ImportedDataset) {
        tracing::debug!(
            entity = %dataset.entity,
            file = %dataset.file_name,
            rows = dataset.rows.len(),
            "应用导入结果"
        );
        self.replace_rows(dataset.entity, dataset.rows);
    }

    /// 当前任务号集合（供规则录入守卫使用）
    pub fn task_ids(&self) -> HashSet<&str> {
        self.tasks
            .iter()
            .filter_map(|row| row.get(EntityKind::Tasks.id_column()))
            .map(String::as_str)
            .collect()
    }

    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new(self.rules.clone(), self.priorities)
    }

    pub fn set_rule_set(&mut self, rule_set: RuleSet) {
        self.rules = rule_set.rules;
        self.priorities = rule_set.priorities;
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.workers.is_empty() && self.tasks.is_empty()
    }

    /// 序列化为交换格式（缩进 2）
    pub fn to_json_pretty(&self) -> SessionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从交换格式解析
    ///
    /// # 规则
    /// - clients / workers / tasks 必须存在, 否则 MissingCollection
    /// - rules 缺省为空, priorities 缺省为默认权重
    /// - 单元格的数字/布尔值转为字符串, null 转为空串
    pub fn from_json(raw: &str) -> SessionResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let obj = value
            .as_object()
            .ok_or_else(|| SessionError::InvalidShape("顶层必须是对象".to_string()))?;

        let mut session = Session::default();
        for entity in EntityKind::ALL {
            let rows = obj
                .get(entity.as_str())
                .ok_or(SessionError::MissingCollection(entity))?;
            session.replace_rows(entity, rows_from_value(entity, rows)?);
        }

        if let Some(rules) = obj.get("rules") {
            session.rules = serde_json::from_value(rules.clone())?;
        }
        if let Some(priorities) = obj.get("priorities") {
            session.priorities = serde_json::from_value(priorities.clone())?;
        }

        Ok(session)
    }
}

/// 将 JSON 数组转为行记录列表
fn rows_from_value(entity: EntityKind, value: &Value) -> SessionResult<Vec<RawRow>> {
    let items = value
        .as_array()
        .ok_or_else(|| SessionError::InvalidShape(format!("{} 必须是数组", entity)))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let obj = item.as_object().ok_or_else(|| {
                SessionError::InvalidShape(format!("{} 第 {} 行必须是对象", entity, idx + 1))
            })?;
            Ok(obj
                .iter()
                .map(|(k, v)| (k.clone(), cell_to_string(v)))
                .collect())
        })
        .collect()
}

fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ==========================================
// 排产数据集校验 - 规则 / 会话 JSON 导出
// ==========================================
// rules.json: {"rules":[..],"priorities":{..}}
// 会话文件: 交换格式全量 JSON
// ==========================================

use crate::domain::rule::RuleSet;
use crate::domain::session::Session;
use crate::export::error::ExportResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 规则文件名
pub const RULES_FILE_NAME: &str = "rules.json";

/// 会话文件名
pub const SESSION_FILE_NAME: &str = "data-alchemist-session.json";

pub struct RulesExporter;

impl RulesExporter {
    /// 规则集序列化（缩进 2）
    pub fn rules_json(&self, rule_set: &RuleSet) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(rule_set)?)
    }

    /// 写出 rules.json 到目录
    pub fn export_rules(&self, rule_set: &RuleSet, dir: &Path) -> ExportResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(RULES_FILE_NAME);
        fs::write(&path, self.rules_json(rule_set)?)?;

        info!(rules = rule_set.rules.len(), file = %path.display(), "规则导出完成");
        Ok(path)
    }

    /// 写出完整会话到目录
    pub fn export_session(&self, session: &Session, dir: &Path) -> ExportResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(SESSION_FILE_NAME);
        fs::write(&path, serde_json::to_string_pretty(session)?)?;

        info!(file = %path.display(), "会话导出完成");
        Ok(path)
    }
}

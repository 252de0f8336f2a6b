// ==========================================
// 排产数据集校验 - 工作区 API
// ==========================================
// 职责: 串联导入 / 校验 / 规则录入 / 检索 / 导出 / 会话持久化
// 当前会话: 最近一次保存的会话快照; 每次修改保存为新快照
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ValidationConfig};
use crate::domain::records::RawRow;
use crate::domain::rule::{PriorityWeights, Rule, RuleSet};
use crate::domain::session::Session;
use crate::domain::types::EntityKind;
use crate::engine::phase_decoder::PhaseDecoder;
use crate::engine::rule_suggester::RuleSuggester;
use crate::engine::task_query::TaskQuery;
use crate::engine::validator::{ValidationEngine, ValidationInput, ValidationReport};
use crate::export::{CsvExporter, RulesExporter};
use crate::importer::{WorkspaceImporter, WorkspaceImporterImpl};
use crate::repository::{SessionRepository, SessionSummary};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedFile {
    pub file_name: String,
    pub entity: EntityKind,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// 全部失败时不保存会话
    pub session_id: Option<String>,
    pub imported: Vec<ImportedFile>,
    pub failed: Vec<FailedFile>,
}

/// 工作区 API
pub struct WorkspaceApi {
    sessions: SessionRepository,
    config: ConfigManager,
    importer: WorkspaceImporterImpl,
}

impl WorkspaceApi {
    /// 打开数据库文件
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 共享同一连接创建
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let sessions = SessionRepository::from_connection(conn)?;

        Ok(Self {
            sessions,
            config,
            importer: WorkspaceImporterImpl::new(),
        })
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config
    }

    /// 读取校验配置
    pub async fn validation_config(&self) -> ApiResult<ValidationConfig> {
        ValidationConfig::load(&self.config)
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 当前会话（无历史时为空会话, 权重取配置默认值）
    pub async fn current_session(&self) -> ApiResult<Session> {
        if let Some((_, session)) = self.sessions.load_latest()? {
            return Ok(session);
        }
        let config = self.validation_config().await?;
        Ok(Session {
            priorities: config.default_priorities,
            ..Session::default()
        })
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 导入文件到当前会话并保存
    ///
    /// # 说明
    /// - 每个文件整体替换对应数据集
    /// - 单个文件失败不影响其他文件
    pub async fn import_files(&self, paths: &[PathBuf]) -> ApiResult<ImportOutcome> {
        let mut session = self.current_session().await?;
        let results = self.importer.import_files(paths).await;

        let mut imported = Vec::new();
        let mut failed = Vec::new();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(dataset) => {
                    imported.push(ImportedFile {
                        file_name: dataset.file_name.clone(),
                        entity: dataset.entity,
                        rows: dataset.rows.len(),
                    });
                    session.apply(dataset);
                }
                Err(e) => failed.push(FailedFile {
                    file: path.display().to_string(),
                    error: e.to_string(),
                }),
            }
        }

        let session_id = if imported.is_empty() {
            warn!("没有成功导入的文件，会话未保存");
            None
        } else {
            Some(self.sessions.save(&session)?)
        };

        Ok(ImportOutcome {
            session_id,
            imported,
            failed,
        })
    }

    /// 从交换格式 JSON 文件恢复会话并保存
    pub async fn import_session_file(&self, path: &Path) -> ApiResult<String> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::InvalidInput(format!("{}: {}", path.display(), e)))?;
        let session = Session::from_json(&raw)?;
        Ok(self.sessions.save(&session)?)
    }

    // ==========================================
    // 校验
    // ==========================================

    /// 校验给定会话
    pub async fn validate_session(&self, session: &Session) -> ApiResult<ValidationReport> {
        let config = self.validation_config().await?;
        let engine = ValidationEngine::new(&config);

        Ok(engine.validate_with_summary(ValidationInput {
            clients: &session.clients,
            workers: &session.workers,
            tasks: &session.tasks,
            rules: &session.rules,
        }))
    }

    /// 校验当前会话
    pub async fn validate_current(&self) -> ApiResult<ValidationReport> {
        let session = self.current_session().await?;
        self.validate_session(&session).await
    }

    /// 直接校验文件（不落库）
    ///
    /// # 参数
    /// - paths: 数据集文件
    /// - rules_file: 可选 rules.json（{"rules":[..],"priorities":{..}}）
    ///
    /// # 错误
    /// - 任一文件导入失败 → ApiError::ImportError
    pub async fn validate_files(
        &self,
        paths: &[PathBuf],
        rules_file: Option<&Path>,
    ) -> ApiResult<ValidationReport> {
        let mut session = Session::default();
        for (path, result) in paths.iter().zip(self.importer.import_files(paths).await) {
            match result {
                Ok(dataset) => session.apply(dataset),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "文件导入失败，终止校验");
                    return Err(e.into());
                }
            }
        }

        if let Some(rules_path) = rules_file {
            session.set_rule_set(read_rule_set(rules_path).await?);
        }

        self.validate_session(&session).await
    }

    // ==========================================
    // 规则录入
    // ==========================================

    /// 添加规则（引用的任务必须存在于当前任务集）
    pub async fn add_rule(&self, rule: Rule) -> ApiResult<String> {
        let mut session = self.current_session().await?;
        let mut rule_set = session.rule_set();
        rule_set.add_rule(rule, &session.task_ids())?;
        session.set_rule_set(rule_set);

        let id = self.sessions.save(&session)?;
        info!(session_id = %id, rules = session.rules.len(), "规则已添加");
        Ok(id)
    }

    /// 按下标删除规则
    pub async fn remove_rule(&self, index: usize) -> ApiResult<Rule> {
        let mut session = self.current_session().await?;
        let mut rule_set = session.rule_set();
        let removed = rule_set.remove_rule(index)?;
        session.set_rule_set(rule_set);

        self.sessions.save(&session)?;
        Ok(removed)
    }

    /// 设置排序权重
    pub async fn set_priorities(&self, weights: PriorityWeights) -> ApiResult<String> {
        weights.validate()?;
        let mut session = self.current_session().await?;
        session.priorities = weights;
        Ok(self.sessions.save(&session)?)
    }

    /// 部分更新排序权重（未给出的权重保持当前会话的值）
    pub async fn update_priorities(
        &self,
        priority_level: Option<u8>,
        fairness: Option<u8>,
        fulfillment: Option<u8>,
    ) -> ApiResult<String> {
        let current = self.current_session().await?.priorities;
        let weights = PriorityWeights {
            priority_level_weight: priority_level.unwrap_or(current.priority_level_weight),
            fairness_weight: fairness.unwrap_or(current.fairness_weight),
            fulfillment_weight: fulfillment.unwrap_or(current.fulfillment_weight),
        };
        self.set_priorities(weights).await
    }

    /// 基于共享偏好阶段的 coRun 建议
    ///
    /// # 说明
    /// - 已被现有 coRun 规则覆盖的任务对不再建议
    /// - 仅返回建议, 采纳须调用 add_rule
    pub async fn suggest_rules(&self) -> ApiResult<Vec<Rule>> {
        let config = self.validation_config().await?;
        let session = self.current_session().await?;
        let suggester = RuleSuggester::new(PhaseDecoder::new(config.max_phase_range_span));

        let suggestions: Vec<Rule> = suggester
            .suggest_co_runs(&session.tasks)
            .into_iter()
            .filter(|suggestion| !is_covered_by(suggestion, &session.rules))
            .collect();

        info!(suggestions = suggestions.len(), "coRun 建议");
        Ok(suggestions)
    }

    // ==========================================
    // 检索
    // ==========================================

    pub async fn search_tasks(&self, text: &str) -> ApiResult<Vec<RawRow>> {
        let query = TaskQuery::parse(text)?;
        let session = self.current_session().await?;
        Ok(query.filter(&session.tasks).into_iter().cloned().collect())
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出当前会话: 三个 CSV + rules.json + 会话 JSON
    pub async fn export_current(&self, dir: &Path) -> ApiResult<Vec<PathBuf>> {
        let session = self.current_session().await?;
        if session.is_empty() && session.rules.is_empty() {
            return Err(ApiError::NotFound("当前没有可导出的会话".to_string()));
        }

        let mut written = CsvExporter.export_workspace(&session, dir)?;
        written.push(RulesExporter.export_rules(&session.rule_set(), dir)?);
        written.push(RulesExporter.export_session(&session, dir)?);
        Ok(written)
    }

    // ==========================================
    // 会话管理
    // ==========================================

    pub fn list_sessions(&self) -> ApiResult<Vec<SessionSummary>> {
        Ok(self.sessions.list()?)
    }

    pub fn delete_session(&self, session_id: &str) -> ApiResult<()> {
        Ok(self.sessions.delete(session_id)?)
    }

    pub fn reset_sessions(&self) -> ApiResult<usize> {
        Ok(self.sessions.reset()?)
    }
}

async fn read_rule_set(path: &Path) -> ApiResult<RuleSet> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ApiError::InvalidInput(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| ApiError::InvalidInput(format!("规则文件格式错误 {}: {}", path.display(), e)))
}

/// 建议的任务对是否已在同一条 coRun 规则中
fn is_covered_by(suggestion: &Rule, rules: &[Rule]) -> bool {
    let pair = suggestion.task_ids();
    rules.iter().any(|rule| match rule {
        Rule::CoRun { tasks } => pair.iter().all(|id| tasks.iter().any(|t| t.as_str() == *id)),
        Rule::Dependency { .. } => false,
    })
}

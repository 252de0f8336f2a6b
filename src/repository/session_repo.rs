// ==========================================
// 排产数据集校验 - 会话仓储
// ==========================================
// 职责: 会话快照的持久化（sessions 表）
// 存储: 整个会话以交换格式 JSON 存入 payload_json
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::session::Session;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// ==========================================
// SessionSummary - 会话列表项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub saved_at: NaiveDateTime, // UTC
    pub client_count: i64,
    pub worker_count: i64,
    pub task_count: i64,
    pub rule_count: i64,
}

pub struct SessionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SessionRepository {
    /// 打开数据库文件并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 复用已有连接（幂等建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存会话快照
    ///
    /// # 返回
    /// - 新生成的 session_id (UUID v4)
    pub fn save(&self, session: &Session) -> RepositoryResult<String> {
        let session_id = Uuid::new_v4().to_string();
        let saved_at = Utc::now().naive_utc();
        let payload = serde_json::to_string(session)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO sessions (
              session_id, saved_at,
              client_count, worker_count, task_count, rule_count,
              payload_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                session_id,
                saved_at.format(TIMESTAMP_FORMAT).to_string(),
                session.clients.len() as i64,
                session.workers.len() as i64,
                session.tasks.len() as i64,
                session.rules.len() as i64,
                payload,
            ],
        )?;

        info!(session_id = %session_id, "会话已保存");
        Ok(session_id)
    }

    /// 按 ID 读取会话
    pub fn load(&self, session_id: &str) -> RepositoryResult<Option<Session>> {
        let conn = self.get_conn()?;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload_json FROM sessions WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;

        payload
            .map(|raw| Session::from_json(&raw).map_err(RepositoryError::from))
            .transpose()
    }

    /// 读取最近保存的会话
    pub fn load_latest(&self) -> RepositoryResult<Option<(String, Session)>> {
        let conn = self.get_conn()?;

        let latest: Option<(String, String)> = conn
            .query_row(
                "SELECT session_id, payload_json FROM sessions
                 ORDER BY saved_at DESC, rowid DESC LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match latest {
            Some((id, raw)) => Ok(Some((id, Session::from_json(&raw)?))),
            None => Ok(None),
        }
    }

    /// 会话列表（最新在前）
    pub fn list(&self) -> RepositoryResult<Vec<SessionSummary>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT session_id, saved_at, client_count, worker_count, task_count, rule_count
            FROM sessions
            ORDER BY saved_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| map_summary_row(row))?;

        let mut summaries = Vec::new();
        for row in rows {
            let (summary, raw_saved_at) = row?;
            summaries.push(SessionSummary {
                saved_at: parse_timestamp(&raw_saved_at)?,
                ..summary
            });
        }
        Ok(summaries)
    }

    /// 删除会话
    pub fn delete(&self, session_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM sessions WHERE session_id = ?1",
            params![session_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Session".to_string(),
                id: session_id.to_string(),
            });
        }
        info!(session_id = %session_id, "会话已删除");
        Ok(())
    }

    /// 清空全部会话
    ///
    /// # 返回
    /// - 删除的会话数量
    pub fn reset(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM sessions", [])?;
        info!(removed = affected, "会话已清空");
        Ok(affected)
    }
}

fn map_summary_row(row: &Row<'_>) -> rusqlite::Result<(SessionSummary, String)> {
    Ok((
        SessionSummary {
            session_id: row.get(0)?,
            saved_at: NaiveDateTime::default(),
            client_count: row.get(2)?,
            worker_count: row.get(3)?,
            task_count: row.get(4)?,
            rule_count: row.get(5)?,
        },
        row.get(1)?,
    ))
}

fn parse_timestamp(raw: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| RepositoryError::TimestampParseError(format!("{}: {}", raw, e)))
}

// ==========================================
// 排产数据集校验 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::validation_config_trait::{ConfigReadResult, ValidationConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::rule::PriorityWeights;
use crate::engine::phase_decoder::DEFAULT_MAX_RANGE_SPAN;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigReadResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigReadResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigReadResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigReadResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 读取并解析数值配置, 无法解析时回退默认值并告警
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigReadResult<T>
    where
        T: std::str::FromStr + std::fmt::Display + Copy,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        Ok(raw.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = key,
                raw_value = %raw,
                default = %default,
                "配置格式错误，使用默认值"
            );
            default
        }))
    }

    /// 写入配置值（UPSERT, scope_id='global'）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigReadResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式, 按 key 排序）
    pub fn get_config_snapshot(&self) -> ConfigReadResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖现有同名 global 配置, 整体在一个事务内完成
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigReadResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in &config_map {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// ValidationConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ValidationConfigReader for ConfigManager {
    async fn get_max_phase_range_span(&self) -> ConfigReadResult<usize> {
        let span = self.get_parsed_or_default(
            config_keys::MAX_PHASE_RANGE_SPAN,
            DEFAULT_MAX_RANGE_SPAN,
        )?;
        // 0 表示任何范围都不合法, 视为误配置
        Ok(if span == 0 { DEFAULT_MAX_RANGE_SPAN } else { span })
    }

    async fn get_default_priorities(&self) -> ConfigReadResult<PriorityWeights> {
        let defaults = PriorityWeights::default();
        let weights = PriorityWeights {
            priority_level_weight: self.get_parsed_or_default(
                config_keys::PRIORITY_LEVEL_WEIGHT,
                defaults.priority_level_weight,
            )?,
            fairness_weight: self
                .get_parsed_or_default(config_keys::FAIRNESS_WEIGHT, defaults.fairness_weight)?,
            fulfillment_weight: self.get_parsed_or_default(
                config_keys::FULFILLMENT_WEIGHT,
                defaults.fulfillment_weight,
            )?,
        };

        match weights.validate() {
            Ok(()) => Ok(weights),
            Err(e) => {
                tracing::warn!(error = %e, "权重配置超出范围，使用默认权重");
                Ok(defaults)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 阶段解码
    pub const MAX_PHASE_RANGE_SPAN: &str = "max_phase_range_span";

    // 排序权重
    pub const PRIORITY_LEVEL_WEIGHT: &str = "priority_level_weight";
    pub const FAIRNESS_WEIGHT: &str = "fairness_weight";
    pub const FULFILLMENT_WEIGHT: &str = "fulfillment_weight";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let manager = in_memory_manager();

        assert_eq!(
            manager.get_max_phase_range_span().await.unwrap(),
            DEFAULT_MAX_RANGE_SPAN
        );
        assert_eq!(
            manager.get_default_priorities().await.unwrap(),
            PriorityWeights::default()
        );
    }

    #[tokio::test]
    async fn test_unparseable_value_falls_back() {
        let manager = in_memory_manager();
        manager
            .set_config_value(config_keys::MAX_PHASE_RANGE_SPAN, "lots")
            .unwrap();

        assert_eq!(
            manager.get_max_phase_range_span().await.unwrap(),
            DEFAULT_MAX_RANGE_SPAN
        );
    }

    #[tokio::test]
    async fn test_out_of_range_weight_falls_back() {
        let manager = in_memory_manager();
        manager
            .set_config_value(config_keys::FAIRNESS_WEIGHT, "11")
            .unwrap();

        assert_eq!(
            manager.get_default_priorities().await.unwrap(),
            PriorityWeights::default()
        );
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let manager = in_memory_manager();
        manager.set_config_value(config_keys::FAIRNESS_WEIGHT, "4").unwrap();

        let snapshot = manager.get_config_snapshot().unwrap();
        assert_eq!(snapshot, r#"{"fairness_weight":"4"}"#);

        let other = in_memory_manager();
        assert_eq!(other.restore_config_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(
            other
                .get_global_config_value(config_keys::FAIRNESS_WEIGHT)
                .unwrap()
                .as_deref(),
            Some("4")
        );
    }
}

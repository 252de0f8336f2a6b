// ==========================================
// 排产数据集校验 - 配置层
// ==========================================
// 职责: 校验配置的读取与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod validation_config;
pub mod validation_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use validation_config::ValidationConfig;
pub use validation_config_trait::{ConfigReadResult, ValidationConfigReader};

// ==========================================
// 排产数据集校验 - 核心库
// ==========================================
// 输入: 客户 / 工人 / 任务三类数据集 + coRun / dependency 规则
// 输出: 校验结果列表 (Finding) 与按数据集汇总
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 行记录、规则、校验结果、会话
pub mod domain;

// 引擎层 - 阶段解码与检查项
pub mod engine;

// 导入层 - CSV / Excel
pub mod importer;

// 导出层 - CSV / JSON
pub mod export;

// 数据仓储层 - 会话持久化
pub mod repository;

// 配置层 - 校验配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 命令行业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    EntityKind, Finding, PriorityWeights, RawRow, RowRef, Rule, RuleSet, Session, Severity,
    ValidationSummary,
};
pub use engine::{validate, ValidationEngine, ValidationInput, ValidationReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "data-alchemist";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

// ==========================================
// 排产数据集校验 - 校验配置读取 Trait
// ==========================================
// 职责: 定义校验引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::rule::PriorityWeights;
use async_trait::async_trait;
use std::error::Error;

pub type ConfigReadResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ValidationConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ValidationConfigReader: Send + Sync {
    /// 获取范围写法 "a-b" 允许的最大阶段跨度
    ///
    /// # 默认值
    /// - 1000
    async fn get_max_phase_range_span(&self) -> ConfigReadResult<usize>;

    /// 获取默认排序权重
    ///
    /// # 默认值
    /// - priorityLevel 3 / fairness 2 / fulfillment 5
    ///
    /// # 说明
    /// 超出 0..=10 的配置视为无效, 回退默认值
    async fn get_default_priorities(&self) -> ConfigReadResult<PriorityWeights>;
}

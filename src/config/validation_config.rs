// ==========================================
// 排产数据集校验 - 校验配置
// ==========================================

use crate::config::validation_config_trait::{ConfigReadResult, ValidationConfigReader};
use crate::domain::rule::PriorityWeights;
use crate::engine::phase_decoder::DEFAULT_MAX_RANGE_SPAN;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    pub max_phase_range_span: usize,
    pub default_priorities: PriorityWeights,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_phase_range_span: DEFAULT_MAX_RANGE_SPAN,
            default_priorities: PriorityWeights::default(),
        }
    }
}

impl ValidationConfig {
    /// 通过配置读取接口加载
    pub async fn load(reader: &dyn ValidationConfigReader) -> ConfigReadResult<Self> {
        let max_phase_range_span = reader.get_max_phase_range_span().await?;
        let default_priorities = reader.get_default_priorities().await?;

        tracing::debug!(
            max_phase_range_span,
            ?default_priorities,
            "校验配置加载完成"
        );

        Ok(Self {
            max_phase_range_span,
            default_priorities,
        })
    }
}

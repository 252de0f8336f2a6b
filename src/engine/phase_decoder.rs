// ==========================================
// 排产数据集校验 - 阶段列表解码器
// ==========================================
// 职责: AvailableSlots / PreferredPhases 的容错解码
// 顺序: JSON 数组 → 闭区间 start-end → 逗号分隔整数
// ==========================================

use crate::domain::records::{PhaseDecodeError, PhaseList};
use crate::domain::types::Phase;

/// 区间展开的默认上限（阶段个数）
pub const DEFAULT_MAX_RANGE_SPAN: usize = 1_000;

#[derive(Debug, Clone, Copy)]
pub struct PhaseDecoder {
    max_range_span: usize,
}

impl Default for PhaseDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RANGE_SPAN)
    }
}

impl PhaseDecoder {
    pub fn new(max_range_span: usize) -> Self {
        Self { max_range_span }
    }

    /// 解码阶段列表
    ///
    /// # 规则
    /// 1. 以 `[` 开头 → JSON 整数数组
    /// 2. 含 `-` → 闭区间 "start-end"
    /// 3. 其余 → 逗号分隔, 每段解析为整数
    pub fn decode(&self, raw: &str) -> Result<Vec<Phase>, PhaseDecodeError> {
        let value = raw.trim();

        if value.starts_with('[') {
            return serde_json::from_str::<Vec<Phase>>(value)
                .map_err(|e| PhaseDecodeError::InvalidJson(e.to_string()));
        }

        if value.contains('-') {
            return self.decode_range(value);
        }

        value
            .split(',')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<Phase>()
                    .map_err(|_| PhaseDecodeError::InvalidToken(token.to_string()))
            })
            .collect()
    }

    /// 解码可缺失字段（缺失视为解码失败）
    pub fn decode_field(&self, raw: Option<&str>) -> PhaseList {
        match raw {
            None => PhaseList::Malformed(PhaseDecodeError::Missing),
            Some(value) => self.decode(value).into(),
        }
    }

    fn decode_range(&self, value: &str) -> Result<Vec<Phase>, PhaseDecodeError> {
        let (start, end) = value
            .split_once('-')
            .ok_or_else(|| PhaseDecodeError::InvalidRange(value.to_string()))?;

        let start = start
            .trim()
            .parse::<Phase>()
            .map_err(|_| PhaseDecodeError::InvalidRange(value.to_string()))?;
        let end = end
            .trim()
            .parse::<Phase>()
            .map_err(|_| PhaseDecodeError::InvalidRange(value.to_string()))?;

        if start > end {
            return Err(PhaseDecodeError::ReversedRange { start, end });
        }

        // i128 避免极端区间溢出
        let span = (end as i128 - start as i128 + 1) as u128;
        if span > self.max_range_span as u128 {
            return Err(PhaseDecodeError::RangeTooWide {
                start,
                end,
                max: self.max_range_span,
            });
        }

        Ok((start..=end).collect())
    }
}

/// 使用默认解码器解码（失败返回空列表）
pub fn decode_phases(raw: &str) -> Vec<Phase> {
    PhaseDecoder::default().decode(raw).unwrap_or_default()
}

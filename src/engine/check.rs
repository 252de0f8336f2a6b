// ==========================================
// 排产数据集校验 - 检查项接口
// ==========================================
// 职责: 定义单个检查项的接口与共享上下文
// 红线: 检查项之间互不依赖, 不得修改上下文
// ==========================================

use crate::domain::finding::Finding;
use crate::domain::records::RawRow;
use crate::domain::rule::Rule;
use crate::engine::record_parser::ParsedWorkspace;

// ==========================================
// CheckContext - 一次校验调用的只读上下文
// ==========================================
pub struct CheckContext<'a> {
    pub raw_clients: &'a [RawRow],
    pub raw_workers: &'a [RawRow],
    pub raw_tasks: &'a [RawRow],
    pub rules: &'a [Rule],
    pub parsed: &'a ParsedWorkspace,
}

// ==========================================
// DatasetCheck Trait
// ==========================================
// 实现者: structure_checks / coverage_checks / corun_cycle
pub trait DatasetCheck: Send + Sync {
    /// 检查项名称（用于日志）
    fn name(&self) -> &'static str;

    /// 执行检查, 按发现顺序返回结果
    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding>;
}

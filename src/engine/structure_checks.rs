// ==========================================
// 排产数据集校验 - 结构性检查
// ==========================================
// 职责:
// - (a) 必填列存在性（以首行列名为准）
// - (b) 主键唯一性
// - (c) AvailableSlots 可解码
// - (d) RequestedTaskIDs 引用完整性
// - (e) 工人可用时段少于单阶段负载上限（警告）
// ==========================================

use crate::domain::finding::Finding;
use crate::domain::records::{columns, PhaseList, RawRow};
use crate::domain::types::{EntityKind, RowRef};
use crate::engine::check::{CheckContext, DatasetCheck};
use std::collections::HashSet;

/// 各数据集必填列
pub const REQUIRED_CLIENT_COLUMNS: [&str; 3] = [
    columns::CLIENT_ID,
    columns::PRIORITY_LEVEL,
    columns::REQUESTED_TASK_IDS,
];
pub const REQUIRED_WORKER_COLUMNS: [&str; 4] = [
    columns::WORKER_ID,
    columns::SKILLS,
    columns::AVAILABLE_SLOTS,
    columns::MAX_LOAD_PER_PHASE,
];
pub const REQUIRED_TASK_COLUMNS: [&str; 3] = [
    columns::TASK_ID,
    columns::DURATION,
    columns::REQUIRED_SKILLS,
];

pub fn required_columns(entity: EntityKind) -> &'static [&'static str] {
    match entity {
        EntityKind::Clients => &REQUIRED_CLIENT_COLUMNS,
        EntityKind::Workers => &REQUIRED_WORKER_COLUMNS,
        EntityKind::Tasks => &REQUIRED_TASK_COLUMNS,
    }
}

// ==========================================
// (a) SchemaPresenceCheck
// ==========================================
pub struct SchemaPresenceCheck;

impl SchemaPresenceCheck {
    fn check_entity(entity: EntityKind, rows: &[RawRow], findings: &mut Vec<Finding>) {
        // 空数据集不检查
        let Some(first) = rows.first() else {
            return;
        };

        for col in required_columns(entity) {
            if !first.contains_key(*col) {
                findings.push(Finding::error(
                    entity,
                    RowRef::DatasetLevel,
                    *col,
                    format!("{} column is missing", col),
                ));
            }
        }
    }
}

impl DatasetCheck for SchemaPresenceCheck {
    fn name(&self) -> &'static str {
        "schema_presence"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        Self::check_entity(EntityKind::Clients, ctx.raw_clients, &mut findings);
        Self::check_entity(EntityKind::Workers, ctx.raw_workers, &mut findings);
        Self::check_entity(EntityKind::Tasks, ctx.raw_tasks, &mut findings);
        findings
    }
}

// ==========================================
// (b) IdentifierUniquenessCheck
// ==========================================
// 每次重复出现都报告, 行号指向重复出现的那一行
pub struct IdentifierUniquenessCheck;

impl IdentifierUniquenessCheck {
    fn check_ids<'a, I>(entity: EntityKind, ids: I, findings: &mut Vec<Finding>)
    where
        I: Iterator<Item = (usize, Option<&'a str>)>,
    {
        let key = entity.id_column();
        let mut seen = HashSet::new();

        for (row_number, id) in ids {
            // 主键缺失或为空白由必填列检查负责
            let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
                continue;
            };
            if !seen.insert(id) {
                findings.push(Finding::error(
                    entity,
                    RowRef::Row(row_number),
                    key,
                    format!("Duplicate {}: {}", key, id),
                ));
            }
        }
    }
}

impl DatasetCheck for IdentifierUniquenessCheck {
    fn name(&self) -> &'static str {
        "identifier_uniqueness"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let parsed = ctx.parsed;

        Self::check_ids(
            EntityKind::Clients,
            parsed
                .clients
                .iter()
                .map(|c| (c.row_number, c.client_id.as_deref())),
            &mut findings,
        );
        Self::check_ids(
            EntityKind::Workers,
            parsed
                .workers
                .iter()
                .map(|w| (w.row_number, w.worker_id.as_deref())),
            &mut findings,
        );
        Self::check_ids(
            EntityKind::Tasks,
            parsed
                .tasks
                .iter()
                .map(|t| (t.row_number, t.task_id.as_deref())),
            &mut findings,
        );

        findings
    }
}

// ==========================================
// (c) SlotListCheck
// ==========================================
pub struct SlotListCheck;

impl DatasetCheck for SlotListCheck {
    fn name(&self) -> &'static str {
        "slot_list_well_formed"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        ctx.parsed
            .workers
            .iter()
            .filter_map(|worker| match &worker.available_slots {
                PhaseList::Malformed(reason) => Some(Finding::error(
                    EntityKind::Workers,
                    RowRef::Row(worker.row_number),
                    columns::AVAILABLE_SLOTS,
                    format!(
                        "AvailableSlots must be a list of phases like [1,2], 1-3 or 1,2,3 ({})",
                        reason
                    ),
                )),
                PhaseList::Decoded(_) => None,
            })
            .collect()
    }
}

// ==========================================
// (d) TaskReferenceCheck
// ==========================================
pub struct TaskReferenceCheck;

impl DatasetCheck for TaskReferenceCheck {
    fn name(&self) -> &'static str {
        "task_reference_integrity"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let known_task_ids: HashSet<&str> = ctx
            .parsed
            .tasks
            .iter()
            .filter_map(|t| t.task_id.as_deref())
            .collect();

        let mut findings = Vec::new();
        for client in &ctx.parsed.clients {
            for requested in &client.requested_task_ids {
                if !known_task_ids.contains(requested.as_str()) {
                    findings.push(Finding::error(
                        EntityKind::Clients,
                        RowRef::Row(client.row_number),
                        columns::REQUESTED_TASK_IDS,
                        format!("Unknown TaskID requested: {}", requested),
                    ));
                }
            }
        }
        findings
    }
}

// ==========================================
// (e) WorkerOverloadCheck
// ==========================================
// 仅针对解码成功的工人; MaxLoadPerPhase 无法解析时跳过
pub struct WorkerOverloadCheck;

impl DatasetCheck for WorkerOverloadCheck {
    fn name(&self) -> &'static str {
        "worker_overload"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        ctx.parsed
            .workers
            .iter()
            .filter_map(|worker| {
                let PhaseList::Decoded(slots) = &worker.available_slots else {
                    return None;
                };
                let max_load = worker.max_load_per_phase?;
                let slot_count = slots.len() as i64;

                (slot_count < max_load).then(|| {
                    Finding::warning(
                        EntityKind::Workers,
                        RowRef::Row(worker.row_number),
                        columns::AVAILABLE_SLOTS,
                        format!(
                            "Available slots ({}) less than max load per phase ({})",
                            slot_count, max_load
                        ),
                    )
                })
            })
            .collect()
    }
}

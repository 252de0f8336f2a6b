// ==========================================
// 排产数据集校验 - 技能覆盖与产能可行性检查
// ==========================================
// 职责:
// - (f) 任务所需技能至少有一名工人具备
// - (h) 任务时长不超过偏好阶段数
// - (i) 各阶段任务时长需求不超过工人可用数（保守上界, 按偏好阶段重复计入）
// - (j) 合格工人数不少于 MaxConcurrent（警告）
// ==========================================

use crate::domain::finding::Finding;
use crate::domain::records::{columns, TaskRecord, WorkerRecord};
use crate::domain::types::{EntityKind, Phase, RowRef};
use crate::engine::check::{CheckContext, DatasetCheck};
use std::collections::{BTreeMap, BTreeSet, HashSet};

// ==========================================
// (f) SkillCoverageCheck
// ==========================================
// 大小写敏感, 仅 TRIM
pub struct SkillCoverageCheck;

impl DatasetCheck for SkillCoverageCheck {
    fn name(&self) -> &'static str {
        "skill_coverage"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let all_worker_skills: HashSet<&str> = ctx
            .parsed
            .workers
            .iter()
            .flat_map(|w| w.skills.iter().map(String::as_str))
            .collect();

        let mut findings = Vec::new();
        for task in &ctx.parsed.tasks {
            for skill in &task.required_skills {
                if !all_worker_skills.contains(skill.as_str()) {
                    findings.push(Finding::error(
                        EntityKind::Tasks,
                        RowRef::Row(task.row_number),
                        columns::REQUIRED_SKILLS,
                        format!("No worker found with skill \"{}\"", skill),
                    ));
                }
            }
        }
        findings
    }
}

// ==========================================
// (h) PhaseFitCheck
// ==========================================
// Duration 无法解析时跳过
pub struct PhaseFitCheck;

impl DatasetCheck for PhaseFitCheck {
    fn name(&self) -> &'static str {
        "phase_fit"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        ctx.parsed
            .tasks
            .iter()
            .filter_map(|task| {
                let duration = task.duration?;
                let preferred = task.preferred_phases.phases().len() as i64;

                (duration > preferred).then(|| {
                    Finding::error(
                        EntityKind::Tasks,
                        RowRef::Row(task.row_number),
                        columns::DURATION,
                        format!(
                            "Duration ({}) exceeds the number of preferred phases ({})",
                            duration, preferred
                        ),
                    )
                })
            })
            .collect()
    }
}

// ==========================================
// PhaseLoad - 单阶段需求/产能
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseLoad {
    pub demand: i64,   // 偏好该阶段的任务时长之和
    pub capacity: i64, // 该阶段可用工人数
}

/// 计算各阶段需求与产能（按阶段号升序）
///
/// # 规则
/// - 任务对其每一个偏好阶段都计入完整时长（同一阶段重复列出只计一次）
/// - 仅正时长参与计算, 需求累加饱和于 i64::MAX
/// - 工人对其每一个可用阶段计 1（同一阶段重复列出只计一次）
pub fn aggregate_phase_load(tasks: &[TaskRecord], workers: &[WorkerRecord]) -> BTreeMap<Phase, PhaseLoad> {
    let mut load: BTreeMap<Phase, PhaseLoad> = BTreeMap::new();

    for task in tasks {
        let Some(duration) = task.duration.filter(|d| *d > 0) else {
            continue;
        };
        let phases: BTreeSet<Phase> = task.preferred_phases.phases().iter().copied().collect();
        for phase in phases {
            let entry = load.entry(phase).or_default();
            entry.demand = entry.demand.saturating_add(duration);
        }
    }

    for worker in workers {
        let phases: BTreeSet<Phase> = worker.available_slots.phases().iter().copied().collect();
        for phase in phases {
            load.entry(phase).or_default().capacity += 1;
        }
    }

    load
}

// ==========================================
// (i) PhaseCapacityCheck
// ==========================================
pub struct PhaseCapacityCheck;

impl DatasetCheck for PhaseCapacityCheck {
    fn name(&self) -> &'static str {
        "phase_capacity"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        aggregate_phase_load(&ctx.parsed.tasks, &ctx.parsed.workers)
            .into_iter()
            .filter(|(_, load)| load.demand > load.capacity)
            .map(|(phase, load)| {
                Finding::error(
                    EntityKind::Tasks,
                    RowRef::DatasetLevel,
                    columns::PREFERRED_PHASES,
                    format!(
                        "Phase {} is over capacity: task demand {} exceeds worker capacity {}",
                        phase, load.demand, load.capacity
                    ),
                )
            })
            .collect()
    }
}

// ==========================================
// (j) ConcurrencyFeasibilityCheck
// ==========================================
pub struct ConcurrencyFeasibilityCheck;

impl ConcurrencyFeasibilityCheck {
    /// 合格工人数: 技能覆盖（大小写无关）且可用阶段与偏好阶段有交集
    pub fn qualified_worker_count(task: &TaskRecord, workers: &[WorkerRecord]) -> usize {
        let required: HashSet<String> = task
            .required_skills
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        let preferred: HashSet<Phase> = task.preferred_phases.phases().iter().copied().collect();

        workers
            .iter()
            .filter(|worker| {
                let skills: HashSet<String> = worker.skills_lowercase().into_iter().collect();
                required.is_subset(&skills)
                    && worker
                        .available_slots
                        .phases()
                        .iter()
                        .any(|phase| preferred.contains(phase))
            })
            .count()
    }
}

impl DatasetCheck for ConcurrencyFeasibilityCheck {
    fn name(&self) -> &'static str {
        "concurrency_feasibility"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        ctx.parsed
            .tasks
            .iter()
            .filter_map(|task| {
                let required = task.effective_max_concurrent();
                let qualified = Self::qualified_worker_count(task, &ctx.parsed.workers) as i64;

                (qualified < required).then(|| {
                    Finding::warning(
                        EntityKind::Tasks,
                        RowRef::Row(task.row_number),
                        columns::MAX_CONCURRENT,
                        format!(
                            "Only {} qualified worker(s) for MaxConcurrent {} (short by {})",
                            qualified,
                            required,
                            required - qualified
                        ),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::PhaseList;

    fn task(id: &str, duration: i64, skills: &[&str], phases: Vec<Phase>) -> TaskRecord {
        TaskRecord {
            row_number: 1,
            task_id: Some(id.to_string()),
            duration: Some(duration),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            preferred_phases: PhaseList::Decoded(phases),
            max_concurrent: None,
        }
    }

    fn worker(id: &str, skills: &[&str], slots: Vec<Phase>) -> WorkerRecord {
        WorkerRecord {
            row_number: 1,
            worker_id: Some(id.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            available_slots: PhaseList::Decoded(slots),
            max_load_per_phase: Some(1),
        }
    }

    #[test]
    fn test_aggregate_phase_load_double_counts() {
        let tasks = vec![task("T1", 2, &[], vec![1, 2]), task("T2", 2, &[], vec![1])];
        let workers = vec![worker("W1", &[], vec![1])];

        let load = aggregate_phase_load(&tasks, &workers);

        assert_eq!(load[&1], PhaseLoad { demand: 4, capacity: 1 });
        assert_eq!(load[&2], PhaseLoad { demand: 2, capacity: 0 });
    }

    #[test]
    fn test_aggregate_ignores_repeated_phase_entries() {
        let tasks = vec![task("T1", 3, &[], vec![1, 1])];
        let workers = vec![worker("W1", &[], vec![1, 1, 1])];

        let load = aggregate_phase_load(&tasks, &workers);

        assert_eq!(load[&1], PhaseLoad { demand: 3, capacity: 1 });
    }

    #[test]
    fn test_qualified_worker_count_case_insensitive() {
        let t = task("T1", 1, &["Welding", "painting"], vec![2, 3]);
        let workers = vec![
            worker("W1", &["welding", "PAINTING"], vec![3]),
            worker("W2", &["welding"], vec![2]),
            worker("W3", &["welding", "painting"], vec![4]),
        ];

        assert_eq!(ConcurrencyFeasibilityCheck::qualified_worker_count(&t, &workers), 1);
    }

    #[test]
    fn test_malformed_slots_never_qualify() {
        let t = task("T1", 1, &[], vec![1]);
        let mut w = worker("W1", &[], vec![]);
        w.available_slots = PhaseList::Malformed(crate::domain::records::PhaseDecodeError::Missing);

        assert_eq!(ConcurrencyFeasibilityCheck::qualified_worker_count(&t, &[w]), 0);
    }
}

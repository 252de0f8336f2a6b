// ==========================================
// 排产数据集校验 - coRun 规则建议
// ==========================================
// 职责: 按 PreferredPhases 对任务分组, 同一阶段内的任务两两建议 coRun
// 规则:
// - 阶段按升序遍历, 组内按任务行顺序配对
// - 同一对任务只建议一次（与顺序、阶段无关）
// - 阶段无法解码或 TaskID 为空的任务不参与
// 红线: 只产生建议, 不修改规则集; 采纳须经规则录入守卫
// ==========================================

use crate::domain::records::{columns, RawRow};
use crate::domain::rule::Rule;
use crate::domain::types::Phase;
use crate::engine::phase_decoder::PhaseDecoder;
use indexmap::IndexSet;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSuggester {
    decoder: PhaseDecoder,
}

impl RuleSuggester {
    pub fn new(decoder: PhaseDecoder) -> Self {
        Self { decoder }
    }

    /// 生成 coRun 建议（每条恰好两个任务）
    pub fn suggest_co_runs(&self, tasks: &[RawRow]) -> Vec<Rule> {
        let mut by_phase: BTreeMap<Phase, IndexSet<&str>> = BTreeMap::new();

        for row in tasks {
            let Some(task_id) = row
                .get(columns::TASK_ID)
                .map(String::as_str)
                .filter(|id| !id.trim().is_empty())
            else {
                continue;
            };
            let Some(raw) = row.get(columns::PREFERRED_PHASES) else {
                continue;
            };
            let Ok(phases) = self.decoder.decode(raw) else {
                continue;
            };

            for phase in phases {
                by_phase.entry(phase).or_default().insert(task_id);
            }
        }

        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut suggestions = Vec::new();

        for members in by_phase.values() {
            let members: Vec<&str> = members.iter().copied().collect();
            for (i, &first) in members.iter().enumerate() {
                for &second in &members[i + 1..] {
                    let key = if first <= second {
                        (first, second)
                    } else {
                        (second, first)
                    };
                    if seen.insert(key) {
                        suggestions.push(Rule::co_run([first, second]));
                    }
                }
            }
        }

        tracing::debug!(
            tasks = tasks.len(),
            phases = by_phase.len(),
            suggestions = suggestions.len(),
            "coRun 建议生成完成"
        );
        suggestions
    }
}

/// 使用默认解码器生成 coRun 建议
pub fn suggest_co_runs(tasks: &[RawRow]) -> Vec<Rule> {
    RuleSuggester::default().suggest_co_runs(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, phases: &str) -> RawRow {
        [("TaskID", id), ("PreferredPhases", phases)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_pairs_tasks_sharing_a_phase() {
        let tasks = vec![task("T1", "[1]"), task("T2", "1-2"), task("T3", "3")];

        assert_eq!(suggest_co_runs(&tasks), vec![Rule::co_run(["T1", "T2"])]);
    }

    #[test]
    fn test_pair_suggested_once_across_phases() {
        let tasks = vec![
            task("T2", "[1,2,3]"),
            task("T1", "1-3"),
            task("T3", "3"),
        ];

        let suggestions = suggest_co_runs(&tasks);

        assert_eq!(
            suggestions,
            vec![
                Rule::co_run(["T2", "T1"]),
                Rule::co_run(["T2", "T3"]),
                Rule::co_run(["T1", "T3"]),
            ]
        );
    }

    #[test]
    fn test_repeated_phase_and_task_do_not_self_pair() {
        let tasks = vec![task("T1", "[1,1]"), task("T1", "1")];

        assert!(suggest_co_runs(&tasks).is_empty());
    }

    #[test]
    fn test_undecodable_phases_and_blank_ids_skipped() {
        let tasks = vec![
            task("T1", "[1]"),
            task("T2", "abc"),
            task("T3", "3-1"),
            task("", "1"),
            [("TaskID", "T4")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ];

        assert!(suggest_co_runs(&tasks).is_empty());
    }

    #[test]
    fn test_decoder_cap_applies() {
        let suggester = RuleSuggester::new(PhaseDecoder::new(2));
        let tasks = vec![task("T1", "1-5"), task("T2", "1")];

        assert!(suggester.suggest_co_runs(&tasks).is_empty());
    }
}

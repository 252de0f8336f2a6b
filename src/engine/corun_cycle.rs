// ==========================================
// 排产数据集校验 - coRun 环检测
// ==========================================
// 职责: (g) 以 coRun 规则构图, 深度优先检测环
// 构图: 同一 coRun 集合内任意两个不同任务之间双向连边
// 算法: 显式栈迭代 DFS + 白/灰/黑三色标记, 找到第一个环即停止
// ==========================================

use crate::domain::finding::Finding;
use crate::domain::rule::Rule;
use crate::domain::types::{EntityKind, RowRef};
use crate::engine::check::{CheckContext, DatasetCheck};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// 规则列名（数据集级别结果使用）
pub const CO_RUN_COLUMN: &str = "coRun";

// ==========================================
// CoRunGraph - coRun 关系图
// ==========================================
#[derive(Debug, Default)]
pub struct CoRunGraph<'a> {
    // 插入顺序即遍历顺序, 保证结果确定
    adjacency: IndexMap<&'a str, IndexSet<&'a str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White, // 未访问
    Grey,  // 在当前遍历栈上
    Black, // 已完成
}

struct Frame<'a> {
    node: &'a str,
    parent: Option<&'a str>,
    next: usize,
}

impl<'a> CoRunGraph<'a> {
    pub fn from_rules(rules: &'a [Rule]) -> Self {
        let mut graph = Self::default();

        for rule in rules {
            // dependency 规则不参与 coRun 构图
            let Rule::CoRun { tasks } = rule else {
                continue;
            };

            let members: IndexSet<&str> = tasks.iter().map(String::as_str).collect();
            for &from in &members {
                let edges = graph.adjacency.entry(from).or_default();
                for &to in &members {
                    if from != to {
                        edges.insert(to);
                    }
                }
            }
        }

        graph
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum()
    }

    /// 查找第一个环, 返回环上的一个任务号
    ///
    /// # 说明
    /// - 每条 coRun 关系都是双向边, 沿来边直接折返不构成环
    /// - 遇到仍在遍历栈上的节点即判定为环
    pub fn find_first_cycle(&self) -> Option<&'a str> {
        let mut colors: HashMap<&str, Color> =
            self.adjacency.keys().map(|&n| (n, Color::White)).collect();
        let mut stack: Vec<Frame<'a>> = Vec::new();

        for &root in self.adjacency.keys() {
            if colors.get(root) != Some(&Color::White) {
                continue;
            }

            colors.insert(root, Color::Grey);
            stack.push(Frame {
                node: root,
                parent: None,
                next: 0,
            });

            while let Some(frame) = stack.last_mut() {
                let neighbor = self
                    .adjacency
                    .get(frame.node)
                    .and_then(|edges| edges.get_index(frame.next))
                    .copied();

                let Some(neighbor) = neighbor else {
                    colors.insert(frame.node, Color::Black);
                    stack.pop();
                    continue;
                };
                frame.next += 1;

                if frame.parent == Some(neighbor) {
                    continue;
                }

                match colors.get(neighbor).copied().unwrap_or(Color::White) {
                    Color::Grey => return Some(neighbor),
                    Color::Black => {}
                    Color::White => {
                        let parent = frame.node;
                        colors.insert(neighbor, Color::Grey);
                        stack.push(Frame {
                            node: neighbor,
                            parent: Some(parent),
                            next: 0,
                        });
                    }
                }
            }
        }

        None
    }
}

// ==========================================
// (g) CoRunCycleCheck
// ==========================================
pub struct CoRunCycleCheck;

impl DatasetCheck for CoRunCycleCheck {
    fn name(&self) -> &'static str {
        "co_run_cycle"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let graph = CoRunGraph::from_rules(ctx.rules);
        tracing::trace!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "coRun 构图完成"
        );

        graph
            .find_first_cycle()
            .map(|task_id| {
                Finding::error(
                    EntityKind::Tasks,
                    RowRef::DatasetLevel,
                    CO_RUN_COLUMN,
                    format!("Circular co-run dependency detected involving task '{}'", task_id),
                )
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair_has_no_cycle() {
        let rules = vec![Rule::co_run(["T1", "T2"])];
        let graph = CoRunGraph::from_rules(&rules);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.find_first_cycle(), None);
    }

    #[test]
    fn test_triangle_of_pairs_is_cycle() {
        let rules = vec![
            Rule::co_run(["T1", "T2"]),
            Rule::co_run(["T2", "T3"]),
            Rule::co_run(["T3", "T1"]),
        ];
        let graph = CoRunGraph::from_rules(&rules);

        assert_eq!(graph.find_first_cycle(), Some("T1"));
    }

    #[test]
    fn test_chain_has_no_cycle() {
        let rules = vec![
            Rule::co_run(["T1", "T2"]),
            Rule::co_run(["T2", "T3"]),
            Rule::co_run(["T3", "T4"]),
            Rule::dependency("T4", "T1"),
        ];
        assert_eq!(CoRunGraph::from_rules(&rules).find_first_cycle(), None);
    }

    #[test]
    fn test_repeated_pair_is_not_cycle() {
        let rules = vec![Rule::co_run(["T1", "T2"]), Rule::co_run(["T2", "T1"])];
        assert_eq!(CoRunGraph::from_rules(&rules).find_first_cycle(), None);
    }

    #[test]
    fn test_three_member_set_forms_cycle() {
        let rules = vec![Rule::co_run(["A", "B", "C"])];
        assert!(CoRunGraph::from_rules(&rules).find_first_cycle().is_some());
    }

    #[test]
    fn test_degenerate_sets_are_tolerated() {
        let rules = vec![
            Rule::co_run(Vec::<String>::new()),
            Rule::co_run(["T1"]),
            Rule::co_run(["T2", "T2"]),
        ];
        let graph = CoRunGraph::from_rules(&rules);

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.find_first_cycle(), None);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("T{}", i)).collect();
        let rules: Vec<Rule> = ids
            .windows(2)
            .map(|w| Rule::co_run([w[0].clone(), w[1].clone()]))
            .collect();

        assert_eq!(CoRunGraph::from_rules(&rules).find_first_cycle(), None);
    }
}

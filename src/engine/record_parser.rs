// ==========================================
// 排产数据集校验 - 记录解析器
// ==========================================
// 职责: 原始行 → 强类型记录（TRIM / 列表拆分 / 整数解析 / 阶段解码）
// 红线: 解析永不失败, 非法字段以 None 或 PhaseList::Malformed 表示
// ==========================================

use crate::domain::records::{columns, ClientRecord, RawRow, TaskRecord, WorkerRecord};
use crate::engine::phase_decoder::PhaseDecoder;

/// 三类实体的强类型视图
#[derive(Debug, Clone, Default)]
pub struct ParsedWorkspace {
    pub clients: Vec<ClientRecord>,
    pub workers: Vec<WorkerRecord>,
    pub tasks: Vec<TaskRecord>,
}

pub struct RecordParser {
    decoder: PhaseDecoder,
}

impl RecordParser {
    pub fn new(decoder: PhaseDecoder) -> Self {
        Self { decoder }
    }

    pub fn parse_workspace(
        &self,
        clients: &[RawRow],
        workers: &[RawRow],
        tasks: &[RawRow],
    ) -> ParsedWorkspace {
        ParsedWorkspace {
            clients: clients
                .iter()
                .enumerate()
                .map(|(idx, row)| self.parse_client(row, idx + 1))
                .collect(),
            workers: workers
                .iter()
                .enumerate()
                .map(|(idx, row)| self.parse_worker(row, idx + 1))
                .collect(),
            tasks: tasks
                .iter()
                .enumerate()
                .map(|(idx, row)| self.parse_task(row, idx + 1))
                .collect(),
        }
    }

    pub fn parse_client(&self, row: &RawRow, row_number: usize) -> ClientRecord {
        ClientRecord {
            row_number,
            client_id: get_raw(row, columns::CLIENT_ID),
            priority_level: parse_int(row, columns::PRIORITY_LEVEL),
            requested_task_ids: split_list(row, columns::REQUESTED_TASK_IDS),
        }
    }

    pub fn parse_worker(&self, row: &RawRow, row_number: usize) -> WorkerRecord {
        WorkerRecord {
            row_number,
            worker_id: get_raw(row, columns::WORKER_ID),
            skills: split_list(row, columns::SKILLS),
            available_slots: self
                .decoder
                .decode_field(row.get(columns::AVAILABLE_SLOTS).map(String::as_str)),
            max_load_per_phase: parse_int(row, columns::MAX_LOAD_PER_PHASE),
        }
    }

    pub fn parse_task(&self, row: &RawRow, row_number: usize) -> TaskRecord {
        TaskRecord {
            row_number,
            task_id: get_raw(row, columns::TASK_ID),
            duration: parse_int(row, columns::DURATION),
            required_skills: split_list(row, columns::REQUIRED_SKILLS),
            preferred_phases: self
                .decoder
                .decode_field(row.get(columns::PREFERRED_PHASES).map(String::as_str)),
            max_concurrent: parse_int(row, columns::MAX_CONCURRENT),
        }
    }
}

/// 原值提取（主键按原样比较, 不做 TRIM）
fn get_raw(row: &RawRow, key: &str) -> Option<String> {
    row.get(key).cloned()
}

/// 整数解析（TRIM 后解析, 失败为 None）
fn parse_int(row: &RawRow, key: &str) -> Option<i64> {
    row.get(key).and_then(|v| v.trim().parse::<i64>().ok())
}

/// 逗号分隔列表（TRIM, 丢弃空项）
fn split_list(row: &RawRow, key: &str) -> Vec<String> {
    row.get(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::PhaseList;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_client_splits_requests() {
        let parser = RecordParser::new(PhaseDecoder::default());
        let client = parser.parse_client(
            &row(&[
                ("ClientID", "C1"),
                ("PriorityLevel", " 4 "),
                ("RequestedTaskIDs", "T1, T2,,T3 "),
            ]),
            1,
        );

        assert_eq!(client.client_id.as_deref(), Some("C1"));
        assert_eq!(client.priority_level, Some(4));
        assert_eq!(client.requested_task_ids, vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn test_parse_worker_malformed_slots() {
        let parser = RecordParser::new(PhaseDecoder::default());
        let worker = parser.parse_worker(
            &row(&[
                ("WorkerID", "W1"),
                ("Skills", "welding, Painting"),
                ("AvailableSlots", "abc"),
                ("MaxLoadPerPhase", "x"),
            ]),
            3,
        );

        assert_eq!(worker.row_number, 3);
        assert_eq!(worker.skills, vec!["welding", "Painting"]);
        assert!(worker.available_slots.is_malformed());
        assert_eq!(worker.max_load_per_phase, None);
    }

    #[test]
    fn test_parse_task_fields() {
        let parser = RecordParser::new(PhaseDecoder::default());
        let task = parser.parse_task(
            &row(&[
                ("TaskID", "T1"),
                ("Duration", "2"),
                ("RequiredSkills", "welding"),
                ("PreferredPhases", "1-3"),
            ]),
            1,
        );

        assert_eq!(task.duration, Some(2));
        assert_eq!(task.preferred_phases, PhaseList::Decoded(vec![1, 2, 3]));
        assert_eq!(task.effective_max_concurrent(), 1);
    }
}

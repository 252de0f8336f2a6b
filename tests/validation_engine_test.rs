// ==========================================
// 校验引擎集成测试
// ==========================================
// 覆盖: 幂等性 / 全量性 / 各检查项的典型场景
// ==========================================

mod test_helpers;

use data_alchemist::engine::{decode_phases, PhaseDecoder, ValidationEngine, ValidationInput};
use data_alchemist::config::ValidationConfig;
use data_alchemist::{validate, EntityKind, Finding, RowRef, Rule, Severity};
use test_helpers::{clean_workspace, client, row, task, worker};

fn errors_for(findings: &[Finding], entity: EntityKind) -> Vec<&Finding> {
    findings
        .iter()
        .filter(|f| f.entity == entity && f.severity == Severity::Error)
        .collect()
}

// ==========================================
// 通用性质
// ==========================================

#[test]
fn test_clean_workspace_has_no_findings() {
    let (clients, workers, tasks) = clean_workspace();
    let findings = validate(&clients, &workers, &tasks, &[]);
    assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
}

#[test]
fn test_validation_is_idempotent_and_does_not_mutate_input() {
    let clients = vec![client("C1", "3", "T1,T9"), client("C1", "2", "")];
    let workers = vec![worker("W1", "welding", "oops", "2")];
    let tasks = vec![task("T1", "5", "welding,cutting", "[1,2]", "3")];
    let rules = vec![Rule::co_run(["T1", "T2"]), Rule::co_run(["T2", "T3"]), Rule::co_run(["T3", "T1"])];

    let snapshot = (clients.clone(), workers.clone(), tasks.clone(), rules.clone());

    let first = validate(&clients, &workers, &tasks, &rules);
    let second = validate(&clients, &workers, &tasks, &rules);

    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(snapshot, (clients, workers, tasks, rules));
}

#[test]
fn test_empty_collections_are_valid_input() {
    assert!(validate(&[], &[], &[], &[]).is_empty());

    // 只有任务, 没有工人: 技能覆盖与产能检查仍然运行
    let tasks = vec![task("T1", "1", "welding", "1", "1")];
    let findings = validate(&[], &[], &tasks, &[]);
    assert!(findings
        .iter()
        .any(|f| f.column == "RequiredSkills" && f.message.contains("welding")));
}

// ==========================================
// 结构性检查
// ==========================================

#[test]
fn test_duplicate_client_id_reported_once_at_second_row() {
    let clients = vec![client("C1", "1", ""), client("C1", "2", "")];

    let findings = validate(&clients, &[], &[], &[]);
    let duplicates: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.message.contains("Duplicate"))
        .collect();

    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].severity, Severity::Error);
    assert_eq!(duplicates[0].entity, EntityKind::Clients);
    assert_eq!(duplicates[0].row_index, RowRef::Row(2));
    assert_eq!(duplicates[0].column, "ClientID");
}

#[test]
fn test_blank_ids_are_not_duplicates() {
    let clients = vec![
        client("", "1", ""),
        client("  ", "2", ""),
        client("", "3", ""),
        client("C1", "4", ""),
    ];

    let findings = validate(&clients, &[], &[], &[]);
    assert!(findings.iter().all(|f| !f.message.contains("Duplicate")));
}

#[test]
fn test_missing_column_does_not_suppress_other_checks() {
    // 缺少 MaxLoadPerPhase 列, 同时 AvailableSlots 无法解码
    let workers = vec![row(&[
        ("WorkerID", "W1"),
        ("Skills", "welding"),
        ("AvailableSlots", "abc"),
    ])];

    let findings = validate(&[], &workers, &[], &[]);
    let errors = errors_for(&findings, EntityKind::Workers);

    assert!(errors
        .iter()
        .any(|f| f.row_index == RowRef::DatasetLevel && f.column == "MaxLoadPerPhase"));
    assert!(errors
        .iter()
        .any(|f| f.row_index == RowRef::Row(1) && f.column == "AvailableSlots"));
}

#[test]
fn test_unknown_requested_task_ids_each_reported() {
    let clients = vec![client("C1", "3", "TX,TY,TZ")];
    let tasks = vec![task("T1", "1", "", "1", "1")];

    let findings = validate(&clients, &[], &tasks, &[]);
    let unknown: Vec<&Finding> = errors_for(&findings, EntityKind::Clients)
        .into_iter()
        .filter(|f| f.column == "RequestedTaskIDs")
        .collect();

    assert_eq!(unknown.len(), 3);
    assert!(unknown.iter().all(|f| f.row_index == RowRef::Row(1)));
    assert!(unknown[0].message.contains("TX"));
    assert!(unknown[2].message.contains("TZ"));
}

#[test]
fn test_worker_overload_is_a_warning() {
    let workers = vec![worker("W1", "welding", "[1,2]", "3")];

    let findings = validate(&[], &workers, &[], &[]);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert_eq!(findings[0].entity, EntityKind::Workers);
    assert_eq!(findings[0].row_index, RowRef::Row(1));
}

// ==========================================
// 阶段解码
// ==========================================

#[test]
fn test_phase_encodings_decode_identically() {
    assert_eq!(decode_phases("[1,2,3]"), vec![1, 2, 3]);
    assert_eq!(decode_phases("1-3"), vec![1, 2, 3]);
    assert_eq!(decode_phases("1,2,3"), vec![1, 2, 3]);
    assert_eq!(decode_phases(" 1 - 3 "), vec![1, 2, 3]);
    assert!(decode_phases("abc").is_empty());
}

#[test]
fn test_malformed_slots_reported_only_by_slot_check() {
    let workers = vec![worker("W1", "welding", "abc", "1")];

    let findings = validate(&[], &workers, &[], &[]);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].column, "AvailableSlots");
    assert_eq!(findings[0].severity, Severity::Error);
}

#[test]
fn test_default_range_cap_boundary() {
    let decoder = PhaseDecoder::default();
    assert_eq!(decoder.decode("1-1000").unwrap().len(), 1000);
    assert!(decoder.decode("1-1001").is_err());

    let within = vec![worker("W1", "welding", "1-1000", "1")];
    assert!(validate(&[], &within, &[], &[]).is_empty());

    let beyond = vec![worker("W1", "welding", "1-1500", "1")];
    let findings = validate(&[], &beyond, &[], &[]);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].column, "AvailableSlots");
}

#[test]
fn test_configured_range_span_limits_decoding() {
    let decoder = PhaseDecoder::new(5);
    assert!(decoder.decode("1-5").is_ok());
    assert!(decoder.decode("1-6").is_err());

    let engine = ValidationEngine::new(&ValidationConfig {
        max_phase_range_span: 5,
        ..ValidationConfig::default()
    });
    let workers = vec![worker("W1", "welding", "1-10", "1")];
    let findings = engine.validate(ValidationInput {
        clients: &[],
        workers: &workers,
        tasks: &[],
        rules: &[],
    });

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].column, "AvailableSlots");
}

// ==========================================
// coRun 环检测
// ==========================================

#[test]
fn test_corun_triangle_is_a_cycle() {
    let tasks = vec![
        task("T1", "1", "", "1", "1"),
        task("T2", "1", "", "1", "1"),
        task("T3", "1", "", "1", "1"),
    ];
    let rules = vec![
        Rule::co_run(["T1", "T2"]),
        Rule::co_run(["T2", "T3"]),
        Rule::co_run(["T3", "T1"]),
    ];

    let findings = validate(&[], &[], &tasks, &rules);
    let cycles: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.message.contains("Circular co-run"))
        .collect();

    assert!(!cycles.is_empty());
    assert!(cycles
        .iter()
        .all(|f| f.entity == EntityKind::Tasks && f.row_index == RowRef::DatasetLevel));
}

#[test]
fn test_single_corun_pair_is_not_a_cycle() {
    let rules = vec![Rule::co_run(["T1", "T2"]), Rule::dependency("T1", "T2")];

    let findings = validate(&[], &[], &[], &rules);
    assert!(findings.iter().all(|f| !f.message.contains("Circular")));
}

// ==========================================
// 覆盖与产能
// ==========================================

#[test]
fn test_duration_exceeding_preferred_phases() {
    let workers = vec![worker("W1", "welding", "[1,2,3]", "1")];

    let too_long = vec![task("T1", "3", "welding", "[1,2]", "1")];
    let findings = validate(&[], &workers, &too_long, &[]);
    assert!(findings
        .iter()
        .any(|f| f.column == "Duration" && f.row_index == RowRef::Row(1)));

    let fits = vec![task("T1", "3", "welding", "[1,2,3]", "1")];
    let findings = validate(&[], &workers, &fits, &[]);
    assert!(findings.iter().all(|f| f.column != "Duration"));
}

#[test]
fn test_phase_capacity_exceeded() {
    let workers = vec![worker("W1", "welding", "[1]", "1")];
    let tasks = vec![
        task("T1", "2", "welding", "[1]", "1"),
        task("T2", "2", "welding", "[1]", "1"),
    ];

    let findings = validate(&[], &workers, &tasks, &[]);
    let capacity: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.message.contains("over capacity"))
        .collect();

    assert_eq!(capacity.len(), 1);
    assert_eq!(capacity[0].row_index, RowRef::DatasetLevel);
    assert!(capacity[0].message.contains("Phase 1"));
    assert!(capacity[0].message.contains("demand 4"));
    assert!(capacity[0].message.contains("capacity 1"));
}

#[test]
fn test_phase_demand_near_i64_max_saturates() {
    let max = i64::MAX.to_string();
    let workers = vec![worker("W1", "welding", "[1]", "1")];
    let tasks = vec![
        task("T1", &max, "welding", "[1]", "1"),
        task("T2", &max, "welding", "[1]", "1"),
    ];

    let findings = validate(&[], &workers, &tasks, &[]);
    let capacity: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.message.contains("over capacity"))
        .collect();

    assert_eq!(capacity.len(), 1);
    assert!(capacity[0].message.contains("Phase 1"));
    assert!(capacity[0].message.contains(&format!("demand {}", i64::MAX)));
}

#[test]
fn test_uncovered_skill_reported_once() {
    let workers = vec![worker("W1", "painting", "[1,2]", "1")];
    let tasks = vec![task("T1", "1", "welding", "[1]", "1")];

    let findings = validate(&[], &workers, &tasks, &[]);
    let skill: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.column == "RequiredSkills")
        .collect();

    assert_eq!(skill.len(), 1);
    assert_eq!(skill[0].severity, Severity::Error);
    assert!(skill[0].message.contains("welding"));
}

#[test]
fn test_insufficient_qualified_workers_is_a_warning() {
    let workers = vec![
        worker("W1", "Welding", "[1,2]", "1"),
        worker("W2", "welding", "[5]", "1"),
    ];
    let tasks = vec![task("T1", "1", "welding", "[1]", "3")];

    let findings = validate(&[], &workers, &tasks, &[]);
    let concurrency: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.column == "MaxConcurrent")
        .collect();

    assert_eq!(concurrency.len(), 1);
    assert_eq!(concurrency[0].severity, Severity::Warning);
    assert!(concurrency[0].message.contains("Only 1"));
    assert!(concurrency[0].message.contains("short by 2"));
}

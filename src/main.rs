// ==========================================
// 排产数据集校验 - 命令行入口
// ==========================================
// stdout: 校验结果 / 检索结果 / JSON
// stderr: 日志
// ==========================================

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use data_alchemist::api::WorkspaceApi;
use data_alchemist::db::get_default_db_path;
use data_alchemist::{logging, Rule, ValidationReport};

/// Data Alchemist - scheduling dataset validator
#[derive(Parser, Debug)]
#[command(name = "data-alchemist")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    DATA_ALCHEMIST_DB_PATH   Session database path\n    RUST_LOG                 Log filter (default: info)")]
pub struct Cli {
    /// Session database path (overrides DATA_ALCHEMIST_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate dataset files, or the current session when no file is given
    Validate {
        /// clients / workers / tasks files (.csv, .xlsx, .xls)
        files: Vec<PathBuf>,

        /// rules.json to validate against
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Print findings as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 1 when any error is found
        #[arg(long)]
        fail_on_error: bool,
    },

    /// Import dataset files (or a session JSON) into a new session snapshot
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Export the current session as CSV files, rules.json and session JSON
    Export {
        #[arg(long)]
        out: PathBuf,
    },

    /// Edit the rules of the current session
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Set prioritization weights (0-10 each); omitted weights keep their current value
    Priorities {
        #[arg(long)]
        priority_level: Option<u8>,
        #[arg(long)]
        fairness: Option<u8>,
        #[arg(long)]
        fulfillment: Option<u8>,
    },

    /// Search tasks, e.g. "skill welding, duration > 2, phase 1"
    Search { query: String },

    /// Inspect or clear stored sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Read or write validation settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum RuleAction {
    /// Tasks that must run together
    CoRun {
        #[arg(required = true, num_args = 2..)]
        tasks: Vec<String>,
    },
    /// `after` may not start before `before` finishes
    Dependency {
        #[arg(long)]
        before: String,
        #[arg(long)]
        after: String,
    },
    /// Suggest co-run pairs for tasks sharing a preferred phase
    Suggest {
        /// Add every suggestion through the rule guard
        #[arg(long)]
        add: bool,
    },
    /// Remove a rule by its zero-based index
    Remove { index: usize },
    /// List rules of the current session
    List,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Print the current session as JSON
    Show,
    /// List stored sessions, newest first
    List,
    /// Delete one stored session
    Delete { session_id: String },
    /// Delete all stored sessions
    Reset,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Print all stored settings as JSON
    Show,
    /// Store a setting
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli
        .db
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    tracing::debug!(db_path = %db_path, "使用数据库");

    let api = WorkspaceApi::new(&db_path).with_context(|| format!("无法打开数据库 {}", db_path))?;

    match cli.command {
        Command::Validate {
            files,
            rules,
            json,
            fail_on_error,
        } => {
            let report = if files.is_empty() {
                if rules.is_some() {
                    anyhow::bail!("--rules 仅在指定数据集文件时可用");
                }
                api.validate_current().await?
            } else {
                api.validate_files(&files, rules.as_deref()).await?
            };
            print_report(&report, json)?;

            if fail_on_error && report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Import { files } => run_import(&api, &files).await?,
        Command::Export { out } => {
            for path in api.export_current(&out).await? {
                println!("{}", path.display());
            }
        }
        Command::Rule { action } => run_rule(&api, action).await?,
        Command::Priorities {
            priority_level,
            fairness,
            fulfillment,
        } => {
            let id = api
                .update_priorities(priority_level, fairness, fulfillment)
                .await?;
            println!("{}", id);
        }
        Command::Search { query } => {
            let rows = api.search_tasks(&query).await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Command::Session { action } => run_session(&api, action).await?,
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let snapshot = api
                    .config_manager()
                    .get_config_snapshot()
                    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
                println!("{}", snapshot);
            }
            ConfigAction::Set { key, value } => api
                .config_manager()
                .set_config_value(&key, &value)
                .map_err(|e| anyhow::anyhow!(e.to_string()))?,
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &ValidationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn is_session_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

async fn run_import(api: &WorkspaceApi, files: &[PathBuf]) -> Result<()> {
    let (sessions, datasets): (Vec<PathBuf>, Vec<PathBuf>) =
        files.iter().cloned().partition(|p| is_session_file(p));

    for path in &sessions {
        let id = api.import_session_file(path).await?;
        println!("{}: session restored ({})", path.display(), id);
    }

    if datasets.is_empty() {
        return Ok(());
    }

    let outcome = api.import_files(&datasets).await?;
    for file in &outcome.imported {
        println!("{}: {} row(s) -> {}", file.file_name, file.rows, file.entity);
    }
    for failed in &outcome.failed {
        eprintln!("{}: {}", failed.file, failed.error);
    }
    match &outcome.session_id {
        Some(id) => println!("session {}", id),
        None => anyhow::bail!("没有文件导入成功"),
    }
    Ok(())
}

async fn run_rule(api: &WorkspaceApi, action: RuleAction) -> Result<()> {
    match action {
        RuleAction::CoRun { tasks } => {
            api.add_rule(Rule::co_run(tasks)).await?;
        }
        RuleAction::Dependency { before, after } => {
            api.add_rule(Rule::dependency(before, after)).await?;
        }
        RuleAction::Suggest { add } => {
            for rule in api.suggest_rules().await? {
                if let Rule::CoRun { tasks } = &rule {
                    println!("co-run {}", tasks.join(" "));
                }
                if add {
                    api.add_rule(rule).await?;
                }
            }
        }
        RuleAction::Remove { index } => {
            let removed = api.remove_rule(index).await?;
            println!("removed {}", serde_json::to_string(&removed)?);
        }
        RuleAction::List => {
            let session = api.current_session().await?;
            for (idx, rule) in session.rules.iter().enumerate() {
                println!("{}: {}", idx, serde_json::to_string(rule)?);
            }
        }
    }
    Ok(())
}

async fn run_session(api: &WorkspaceApi, action: SessionAction) -> Result<()> {
    match action {
        SessionAction::Show => {
            let session = api.current_session().await?;
            println!("{}", session.to_json_pretty()?);
        }
        SessionAction::List => {
            for summary in api.list_sessions()? {
                println!(
                    "{}  {}  clients={} workers={} tasks={} rules={}",
                    summary.session_id,
                    summary.saved_at.format("%Y-%m-%d %H:%M:%S"),
                    summary.client_count,
                    summary.worker_count,
                    summary.task_count,
                    summary.rule_count
                );
            }
        }
        SessionAction::Delete { session_id } => api.delete_session(&session_id)?,
        SessionAction::Reset => {
            let removed = api.reset_sessions()?;
            println!("removed {} session(s)", removed);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_flags() {
        let cli = Cli::parse_from([
            "data-alchemist",
            "validate",
            "clients.csv",
            "tasks.csv",
            "--rules",
            "rules.json",
            "--fail-on-error",
        ]);

        assert_eq!(
            cli.command,
            Command::Validate {
                files: vec![PathBuf::from("clients.csv"), PathBuf::from("tasks.csv")],
                rules: Some(PathBuf::from("rules.json")),
                json: false,
                fail_on_error: true,
            }
        );
    }

    #[test]
    fn test_priorities_flags_are_optional() {
        let cli = Cli::parse_from(["data-alchemist", "priorities", "--fairness", "4"]);

        assert_eq!(
            cli.command,
            Command::Priorities {
                priority_level: None,
                fairness: Some(4),
                fulfillment: None,
            }
        );
    }

    #[test]
    fn test_parse_rule_suggest() {
        let cli = Cli::parse_from(["data-alchemist", "rule", "suggest", "--add"]);

        assert_eq!(
            cli.command,
            Command::Rule {
                action: RuleAction::Suggest { add: true },
            }
        );
    }

    #[test]
    fn test_co_run_requires_two_tasks() {
        assert!(Cli::try_parse_from(["data-alchemist", "rule", "co-run", "T1"]).is_err());
    }
}

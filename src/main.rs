// ==========================================
// 车队物流排班模拟系统 - 命令行入口
// ==========================================
// 用法:
//   fleet-sim [--db path] init
//   fleet-sim [--db path] import <dir> [YYYY-MM-DD]
//   fleet-sim [--db path] simulate <drivers> <HH:MM> <max_hours> [YYYY-MM-DD]
//   fleet-sim [--db path] history [limit]
//   fleet-sim [--db path] dashboard
// 输出: stdout 为 JSON; 失败时输出 ErrorResponse 并以 1 退出
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use fleet_logistics_sim::api::{ApiError, ErrorResponse};
use fleet_logistics_sim::app::{get_default_db_path, AppState};
use fleet_logistics_sim::config::SimulationConfigReader;
use fleet_logistics_sim::domain::SimulationInput;
use fleet_logistics_sim::logging;

const USAGE: &str = "用法: fleet-sim [--db path] <init | import <dir> [YYYY-MM-DD] | simulate <drivers> <HH:MM> <max_hours> [YYYY-MM-DD] | history [limit] | dashboard>";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Init,
    Import { dir: PathBuf, reference_date: Option<NaiveDate> },
    Simulate(SimulationInput),
    History { limit: Option<usize> },
    Dashboard,
}

#[derive(Debug, Clone, PartialEq)]
struct CliArgs {
    db_path: Option<String>,
    command: Command,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("日期格式错误 '{}': {}", raw, e))
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut rest: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    let mut db_path = None;
    if rest.first() == Some(&"--db") {
        if rest.len() < 2 {
            return Err("--db 需要路径参数".to_string());
        }
        db_path = Some(rest[1].to_string());
        rest.drain(..2);
    }

    let (name, params) = rest.split_first().ok_or_else(|| USAGE.to_string())?;

    let command = match (*name, params) {
        ("init", []) => Command::Init,
        ("import", [dir]) => Command::Import {
            dir: PathBuf::from(dir),
            reference_date: None,
        },
        ("import", [dir, date]) => Command::Import {
            dir: PathBuf::from(dir),
            reference_date: Some(parse_date(date)?),
        },
        ("simulate", [drivers, start, hours, tail @ ..]) if tail.len() <= 1 => {
            let available_drivers = drivers
                .parse::<usize>()
                .map_err(|e| format!("drivers 必须为非负整数 '{}': {}", drivers, e))?;
            let max_hours = hours
                .parse::<f64>()
                .map_err(|e| format!("max_hours 必须为数字 '{}': {}", hours, e))?;
            let mut input = SimulationInput::new(available_drivers, start, max_hours);
            if let Some(date) = tail.first() {
                input = input.with_plan_date(parse_date(date)?);
            }
            Command::Simulate(input)
        }
        ("history", []) => Command::History { limit: None },
        ("history", [limit]) => Command::History {
            limit: Some(
                limit
                    .parse::<usize>()
                    .map_err(|e| format!("limit 必须为非负整数 '{}': {}", limit, e))?,
            ),
        },
        ("dashboard", []) => Command::Dashboard,
        _ => return Err(USAGE.to_string()),
    };

    Ok(CliArgs { db_path, command })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn execute(state: &AppState, command: Command) -> Result<(), ApiError> {
    match command {
        Command::Init => {
            // AppState::new 已完成建表,这里回显覆写项与生效参数
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| ApiError::ConfigError(e.to_string()))?;
            let overrides: serde_json::Value =
                serde_json::from_str(&snapshot).map_err(|e| ApiError::InternalError(e.to_string()))?;
            let effective = state
                .config_manager
                .load_simulation_parameters()
                .await
                .map_err(|e| ApiError::ConfigError(e.to_string()))?;
            print_json(&serde_json::json!({
                "dbPath": state.db_path,
                "overrides": overrides,
                "parameters": effective,
            }))?;
        }
        Command::Import { dir, reference_date } => {
            let date = reference_date.unwrap_or_else(|| Local::now().date_naive());
            let summary = state.importer.import_dir(&dir, date)?;
            print_json(&summary)?;
        }
        Command::Simulate(input) => {
            let run = state.simulation_api.run_simulation(input).await?;
            print_json(&run)?;
        }
        Command::History { limit } => print_json(&state.simulation_api.list_runs(limit)?)?,
        Command::Dashboard => print_json(&state.dashboard_api.get_dashboard()?)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    tracing::info!(version = fleet_logistics_sim::VERSION, "{}", fleet_logistics_sim::APP_NAME);

    let db_path = cli.db_path.unwrap_or_else(get_default_db_path);
    let state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(msg) => {
            let err = ApiError::DatabaseConnectionError(msg);
            eprintln!("{}", serde_json::to_string(&ErrorResponse::from(&err)).unwrap_or_default());
            return ExitCode::FAILURE;
        }
    };

    match execute(&state, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code(), error = %err, "命令执行失败");
            eprintln!("{}", serde_json::to_string(&ErrorResponse::from(&err)).unwrap_or_default());
            ExitCode::FAILURE
        }
    }
}

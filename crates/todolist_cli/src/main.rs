//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todolist_core` linkage with deterministic output.
//! - Load `name|due_date|priority|notes` arguments into a list and print the
//!   resulting order.
//!
//! Set `TODOLIST_LOG_DIR` to an absolute path to enable file logging.

use log::warn;
use std::process::ExitCode;
use todolist_core::{init_logging, LoggingConfig, TaskListService};

const LOG_DIR_ENV: &str = "TODOLIST_LOG_DIR";

fn main() -> ExitCode {
    if let Some(log_dir) = std::env::var_os(LOG_DIR_ENV) {
        if let Err(err) = init_logging(&LoggingConfig::new(log_dir)) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("todolist_core ping={}", todolist_core::ping());
    println!("todolist_core version={}", todolist_core::core_version());

    let service = TaskListService::new("cli");
    let mut failures = 0;
    for arg in std::env::args().skip(1) {
        if let Err(message) = add_from_arg(&service, &arg) {
            warn!("event=cli_arg module=cli status=error");
            eprintln!("skipped `{arg}`: {message}");
            failures += 1;
        }
    }

    println!("{}", service.render_listing());
    for task in service.late_tasks() {
        println!("late: {}", task.name());
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn add_from_arg(service: &TaskListService, arg: &str) -> Result<(), String> {
    let mut fields = arg.splitn(4, '|');
    let name = fields.next().unwrap_or_default();
    let due_date = fields.next().ok_or("missing due date")?;
    let priority = fields
        .next()
        .ok_or("missing priority")?
        .trim()
        .parse::<u8>()
        .map_err(|err| format!("invalid priority: {err}"))?;
    let notes = fields.next().unwrap_or_default();

    service
        .add_task(name, due_date, priority, notes)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

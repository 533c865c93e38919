//! `ems` command line entry point.
//!
//! # Responsibility
//! - Map flags onto `StoreConfig` and run one store operation per call.
//! - Print records as JSON lines keyed by the legacy column names.

use clap::{Parser, Subcommand, ValueEnum};
use ems_core::{
    default_log_level, export_csv, init_logging, parse_key, seed_demo_data, DeletePolicy,
    ProjectKey, RecordStore, StoreConfig,
};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ems", version, about = "Employee management record store")]
struct Cli {
    /// SQLite database file; created when absent.
    #[arg(long, default_value = "ems.db")]
    db: PathBuf,
    /// Reject deletes of departments, positions or employees still referenced.
    #[arg(long)]
    restrict_deletes: bool,
    #[arg(long)]
    log_level: Option<String>,
    /// Enables file logging into this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create or upgrade the schema
    Init,
    /// Insert demo departments, positions and employees
    Seed,
    /// Print every record of one entity as JSON lines
    List {
        #[arg(value_enum)]
        entity: Entity,
    },
    /// Write one CSV file per table
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Delete one record by key; projects take `<employee-id> <team-id>`
    Delete {
        #[arg(value_enum)]
        entity: Entity,
        #[arg(required = true, num_args = 1..=2)]
        key: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Entity {
    Departments,
    Positions,
    Employees,
    Attendance,
    Leave,
    Projects,
    Payroll,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let policy = if cli.restrict_deletes {
        DeletePolicy::Restrict
    } else {
        DeletePolicy::LeaveDangling
    };
    let store = RecordStore::open(StoreConfig::file(&cli.db).with_delete_policy(policy))?;

    match cli.cmd {
        Cmd::Init => println!("initialized {}", cli.db.display()),
        Cmd::Seed => {
            let summary = seed_demo_data(&store)?;
            println!(
                "seeded {} departments, {} positions, {} employees",
                summary.department_ids.len(),
                summary.position_ids.len(),
                summary.employee_ids.len()
            );
        }
        Cmd::List { entity } => match entity {
            Entity::Departments => print_json_lines(&store.list_departments()?)?,
            Entity::Positions => print_json_lines(&store.list_positions()?)?,
            Entity::Employees => print_json_lines(&store.list_employees()?)?,
            Entity::Attendance => print_json_lines(&store.list_attendance()?)?,
            Entity::Leave => print_json_lines(&store.list_leaves()?)?,
            Entity::Projects => print_json_lines(&store.list_projects()?)?,
            Entity::Payroll => print_json_lines(&store.list_payrolls()?)?,
        },
        Cmd::Export { out } => {
            for path in export_csv(&store, &out)? {
                println!("{}", path.display());
            }
        }
        Cmd::Delete { entity, key } => {
            delete_record(&store, entity, &key)?;
            println!("deleted {entity:?} {}", key.join(" "));
        }
    }

    store.close()?;
    Ok(())
}

fn delete_record(store: &RecordStore, entity: Entity, key: &[String]) -> Result<(), Box<dyn Error>> {
    match (entity, key) {
        (Entity::Projects, [employee_id, team_id]) => {
            store.delete_project(ProjectKey::parse(employee_id, team_id)?)?
        }
        (_, [id]) => delete_by_id(store, entity, parse_key(id)?)?,
        _ => return Err(key_usage(entity).into()),
    }
    Ok(())
}

fn delete_by_id(store: &RecordStore, entity: Entity, id: i64) -> Result<(), Box<dyn Error>> {
    match entity {
        Entity::Departments => store.delete_department(id)?,
        Entity::Positions => store.delete_position(id)?,
        Entity::Employees => store.delete_employee(id)?,
        Entity::Attendance => store.delete_attendance(id)?,
        Entity::Leave => store.delete_leave(id)?,
        Entity::Payroll => store.delete_payroll(id)?,
        Entity::Projects => return Err(key_usage(entity).into()),
    }
    Ok(())
}

fn key_usage(entity: Entity) -> String {
    match entity {
        Entity::Projects => "projects are keyed by <employee-id> <team-id>".to_string(),
        other => format!("{other:?} records are keyed by a single id"),
    }
}

fn print_json_lines<T: Serialize>(records: &[T]) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Cmd, Entity};
    use clap::Parser;
    use ems_core::{RecordStore, RepoError};
    use std::path::Path;

    fn run_args(db: &Path, args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
        let db = db.to_str().unwrap();
        let head = ["ems", "--db", db];
        let argv = head.iter().chain(args).copied();
        run(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn parses_global_flags_and_list_entity() {
        let cli = Cli::try_parse_from(["ems", "--db", "x.db", "--restrict-deletes", "list", "employees"])
            .expect("valid arguments");
        assert!(cli.restrict_deletes);
        assert_eq!(cli.db.to_str(), Some("x.db"));
        assert!(matches!(
            cli.cmd,
            Cmd::List {
                entity: Entity::Employees
            }
        ));
    }

    #[test]
    fn export_requires_out_dir() {
        assert!(Cli::try_parse_from(["ems", "export"]).is_err());
    }

    #[test]
    fn delete_takes_one_or_two_key_parts() {
        let cli = Cli::try_parse_from(["ems", "delete", "projects", "1", "2"]).unwrap();
        match cli.cmd {
            Cmd::Delete { entity, key } => {
                assert!(matches!(entity, Entity::Projects));
                assert_eq!(key, ["1", "2"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["ems", "delete", "departments"]).is_err());
        assert!(Cli::try_parse_from(["ems", "delete", "projects", "1", "2", "3"]).is_err());
    }

    #[test]
    fn restrict_deletes_flag_blocks_referenced_department() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ems.db");
        run_args(&db, &["seed"]).unwrap();

        let err = run_args(&db, &["--restrict-deletes", "delete", "departments", "1"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RepoError>(),
            Some(RepoError::Referenced { .. })
        ));

        // Without the flag the legacy behavior leaves employees dangling.
        run_args(&db, &["delete", "departments", "1"]).unwrap();
        let store = RecordStore::initialize(&db).unwrap();
        assert!(store.get_department(1).unwrap().is_none());
        assert_eq!(store.list_employees().unwrap()[0].dept_name, None);
        store.close().unwrap();
    }

    #[test]
    fn delete_rejects_malformed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ems.db");

        assert!(run_args(&db, &["delete", "projects", "1"]).is_err());
        assert!(run_args(&db, &["delete", "employees", "1", "2"]).is_err());
        assert!(run_args(&db, &["delete", "employees", "abc"]).is_err());
        run_args(&db, &["delete", "projects", "1", "1"]).unwrap();
    }
}

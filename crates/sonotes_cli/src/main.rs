//! Command-line front end for So Notes.
//!
//! # Responsibility
//! - Translate argv into one core command per invocation.
//! - Render tab/note order exactly as the core reports it.
//!
//! # Invariants
//! - Never reorders or filters anything itself.
//! - Exit code is non-zero whenever the core reports an error.

use log::warn;
use sonotes_core::logging::{LOG_DIR_ENV, LOG_LEVEL_ENV};
use sonotes_core::{
    core_version, default_log_level, init_logging, GeometryStore, NotesService, ServiceError,
    ServiceResult, StoreConfig, WindowState,
};
use std::fmt::Write as _;
use std::process::ExitCode;

const USAGE: &str = "\
usage: sonotes <command> [args]

  tabs                              list tabs (* marks the active tab)
  notes <tab>                       list notes of a tab in order
  show <tab> <title>                print note content
  new-tab <name>                    create a tab
  delete-tab <name>                 delete a tab and its notes
  rename-tab <old> <new>            rename a tab in place
  move-tab <from> <to>              move a tab to another position
  select-tab <index>                set the active tab
  add <tab> <title> <content>       append a note
  edit <tab> <title> <content>      replace note content
  rename <tab> <old> <new>          rename a note in place
  delete <tab> <title>              delete a note
  move <source> <target> <title>    move a note to the end of another tab
  reorder <tab> <from> <to>         move a note to another position
  geometry [value]                  show or store window geometry
  version                           print core version

environment: SONOTES_DATA_DIR, SONOTES_LOG_DIR, SONOTES_LOG_LEVEL";

/// One parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Tabs,
    Notes { tab: String },
    Show { tab: String, title: String },
    NewTab { name: String },
    DeleteTab { name: String },
    RenameTab { old: String, new: String },
    MoveTab { from: usize, to: usize },
    SelectTab { index: i64 },
    Add { tab: String, title: String, content: String },
    Edit { tab: String, title: String, content: String },
    Rename { tab: String, old: String, new: String },
    Delete { tab: String, title: String },
    Move { source: String, target: String, title: String },
    Reorder { tab: String, from: usize, to: usize },
    Geometry { value: Option<String> },
    Version,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_logging_from_env();

    let config = StoreConfig::from_env();
    match run(&config, command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging_from_env() {
    let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
        return;
    };
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    if let Err(err) = init_logging(&level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some((name, rest)) = args.split_first() else {
        return Err("missing command".to_string());
    };
    let arg = |index: usize, label: &str| -> Result<String, String> {
        rest.get(index)
            .cloned()
            .ok_or_else(|| format!("`{name}` expects <{label}>"))
    };
    let position = |index: usize, label: &str| -> Result<usize, String> {
        let raw = arg(index, label)?;
        raw.parse()
            .map_err(|_| format!("<{label}> must be a non-negative integer, got `{raw}`"))
    };

    let command = match name.as_str() {
        "tabs" => Command::Tabs,
        "notes" => Command::Notes {
            tab: arg(0, "tab")?,
        },
        "show" => Command::Show {
            tab: arg(0, "tab")?,
            title: arg(1, "title")?,
        },
        "new-tab" => Command::NewTab {
            name: arg(0, "name")?,
        },
        "delete-tab" => Command::DeleteTab {
            name: arg(0, "name")?,
        },
        "rename-tab" => Command::RenameTab {
            old: arg(0, "old")?,
            new: arg(1, "new")?,
        },
        "move-tab" => Command::MoveTab {
            from: position(0, "from")?,
            to: position(1, "to")?,
        },
        "select-tab" => {
            let raw = arg(0, "index")?;
            Command::SelectTab {
                index: raw
                    .parse()
                    .map_err(|_| format!("<index> must be an integer, got `{raw}`"))?,
            }
        }
        "add" => Command::Add {
            tab: arg(0, "tab")?,
            title: arg(1, "title")?,
            content: arg(2, "content")?,
        },
        "edit" => Command::Edit {
            tab: arg(0, "tab")?,
            title: arg(1, "title")?,
            content: arg(2, "content")?,
        },
        "rename" => Command::Rename {
            tab: arg(0, "tab")?,
            old: arg(1, "old")?,
            new: arg(2, "new")?,
        },
        "delete" => Command::Delete {
            tab: arg(0, "tab")?,
            title: arg(1, "title")?,
        },
        "move" => Command::Move {
            source: arg(0, "source")?,
            target: arg(1, "target")?,
            title: arg(2, "title")?,
        },
        "reorder" => Command::Reorder {
            tab: arg(0, "tab")?,
            from: position(1, "from")?,
            to: position(2, "to")?,
        },
        "geometry" => Command::Geometry {
            value: rest.first().cloned(),
        },
        "version" | "--version" => Command::Version,
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(command)
}

fn run(config: &StoreConfig, command: Command) -> Result<String, String> {
    match command {
        Command::Version => return Ok(format!("sonotes core {}", core_version())),
        Command::Geometry { value } => return run_geometry(config, value),
        _ => {}
    }

    let mut service = NotesService::open(config).map_err(describe)?;
    if let Some(backup) = &service.load_summary().backup_path {
        warn!("event=cli_open module=cli status=degraded");
        eprintln!(
            "warning: state file was unreadable; a copy was kept at {}",
            backup.display()
        );
    }

    match command {
        Command::Tabs => Ok(render_tabs(&service)),
        Command::Notes { tab } => {
            let titles = service.note_titles(&tab).map_err(describe)?;
            Ok(render_numbered(&titles))
        }
        Command::Show { tab, title } => service
            .note_content(&tab, &title)
            .map(str::to_string)
            .map_err(describe),
        Command::NewTab { name } => done(service.create_tab(&name)),
        Command::DeleteTab { name } => done(service.delete_tab(&name)),
        Command::RenameTab { old, new } => done(service.rename_tab(&old, &new)),
        Command::MoveTab { from, to } => {
            service.reorder_tab(from, to).map_err(describe)?;
            Ok(render_tabs(&service))
        }
        Command::SelectTab { index } => done(service.set_active_tab(index)),
        Command::Add {
            tab,
            title,
            content,
        } => done(service.add_note(&tab, &title, &content)),
        Command::Edit {
            tab,
            title,
            content,
        } => done(service.update_note_content(&tab, &title, &content)),
        Command::Rename { tab, old, new } => done(service.rename_note(&tab, &old, &new)),
        Command::Delete { tab, title } => done(service.delete_note(&tab, &title)),
        Command::Move {
            source,
            target,
            title,
        } => done(service.move_note(&source, &target, &title)),
        Command::Reorder { tab, from, to } => {
            service.reorder_note(&tab, from, to).map_err(describe)?;
            let titles = service.note_titles(&tab).map_err(describe)?;
            Ok(render_numbered(&titles))
        }
        Command::Version | Command::Geometry { .. } => Ok(String::new()),
    }
}

fn run_geometry(config: &StoreConfig, value: Option<String>) -> Result<String, String> {
    let store = GeometryStore::new(config.geometry_path());
    match value {
        Some(geometry) => {
            store
                .save_if_normal(WindowState::Normal, &geometry)
                .map_err(|err| err.to_string())?;
            Ok(String::new())
        }
        None => Ok(store
            .load()
            .map_err(|err| err.to_string())?
            .unwrap_or_default()),
    }
}

fn render_tabs<S: sonotes_core::StateStore>(service: &NotesService<S>) -> String {
    let active = service.workspace().active_index();
    let mut out = String::new();
    for (index, tab) in service.workspace().tabs().enumerate() {
        let marker = if Some(index) == active { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {index}: {} ({} notes)", tab.name(), tab.len());
    }
    out.trim_end().to_string()
}

fn render_numbered(items: &[String]) -> String {
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{index}: {item}");
    }
    out.trim_end().to_string()
}

/// Commands that print nothing on success.
fn done<T>(result: ServiceResult<T>) -> Result<String, String> {
    result.map(|_| String::new()).map_err(describe)
}

fn describe(err: ServiceError) -> String {
    if err.was_applied() {
        format!("{err} (change kept for this run only)")
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, render_numbered, run, Command};
    use sonotes_core::StoreConfig;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_command_reads_positional_arguments() {
        assert_eq!(
            parse_command(&args(&["move", "Work", "Personal", "t1"])).unwrap(),
            Command::Move {
                source: "Work".to_string(),
                target: "Personal".to_string(),
                title: "t1".to_string(),
            }
        );
        assert_eq!(
            parse_command(&args(&["select-tab", "-1"])).unwrap(),
            Command::SelectTab { index: -1 }
        );
    }

    #[test]
    fn parse_command_rejects_missing_and_invalid_arguments() {
        assert!(parse_command(&[]).is_err());
        assert!(parse_command(&args(&["notes"])).is_err());
        assert!(parse_command(&args(&["reorder", "Work", "x", "1"])).is_err());
        assert!(parse_command(&args(&["frobnicate"])).is_err());
    }

    #[test]
    fn render_numbered_lists_in_given_order() {
        let rendered = render_numbered(&["b".to_string(), "a".to_string()]);
        assert_eq!(rendered, "0: b\n1: a");
    }

    #[test]
    fn run_applies_commands_against_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::in_dir(dir.path());

        run(&config, Command::NewTab { name: "Work".to_string() }).unwrap();
        run(
            &config,
            Command::Add {
                tab: "Work".to_string(),
                title: "t1".to_string(),
                content: "c1".to_string(),
            },
        )
        .unwrap();

        let listing = run(&config, Command::Tabs).unwrap();
        assert_eq!(listing, "* 0: Work (1 notes)");
        let content = run(
            &config,
            Command::Show {
                tab: "Work".to_string(),
                title: "t1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(content, "c1");
    }

    #[test]
    fn run_reports_missing_tab_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::in_dir(dir.path());

        let err = run(&config, Command::DeleteTab { name: "Nope".to_string() }).unwrap_err();

        assert!(err.contains("Nope"));
    }
}

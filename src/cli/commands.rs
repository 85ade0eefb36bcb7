//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{inspect, ApplicationError, IoResultExt, TreeRender};
use crate::cli::args::{Cli, Commands, ConfigCommands, SelectionArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{ScoreTable, Selection, TreeSnapshot};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".into()));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        _ => {
            let container = container(cli)?;
            match command {
                Commands::Tree { selection, max_level } => {
                    cmd_tree(&container, selection, *max_level)
                }
                Commands::Inspect {
                    node,
                    selection,
                    snapshot,
                } => cmd_inspect(&container, node, selection, snapshot.as_deref()),
                Commands::Export { selection, output } => {
                    cmd_export(&container, selection, output.as_deref())
                }
                Commands::Selections => cmd_selections(&container),
                Commands::Summary => cmd_summary(&container),
                Commands::Sample { output, force } => cmd_sample(&container, output.as_deref(), *force),
                Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

/// Working directory for local config: `-C` or cwd.
fn work_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| InfraError::io("get current directory", e).into()),
    }
}

/// Layered settings with command-line overrides on top.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = work_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(data) = &cli.data_file {
        settings.data_file = data.clone();
    }
    if let Some(taxonomy) = &cli.taxonomy {
        settings.taxonomy_file = Some(taxonomy.clone());
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?)?)
}

/// Explicit selection from the arguments, else the configured one.
fn requested_selection(args: &SelectionArgs, settings: &Settings) -> CliResult<Option<Selection>> {
    match (&args.selection, &args.application, &args.scenario) {
        (Some(text), _, _) => Ok(Some(Selection::parse(text)?)),
        (None, Some(app), Some(scenario)) => Ok(Some(Selection::new(app, scenario))),
        (None, Some(_), None) | (None, None, Some(_)) => Err(CliError::InvalidArgs(
            "--application and --scenario must be given together".into(),
        )),
        (None, None, None) => Ok(settings
            .selection
            .as_deref()
            .map(Selection::parse)
            .transpose()?),
    }
}

fn load_with_selection(
    container: &ServiceContainer,
    args: &SelectionArgs,
) -> CliResult<(ScoreTable, Selection)> {
    let table = container.corix.load_table(&container.settings.data_file)?;
    let requested = requested_selection(args, &container.settings)?;
    let selection = container.corix.resolve_selection(&table, requested)?;
    Ok((table, selection))
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, args: &SelectionArgs, max_level: Option<u32>) -> CliResult<()> {
    let (table, selection) = load_with_selection(container, args)?;
    let tree = container.corix.build(&table, &selection)?;
    if tree.is_empty() {
        output::warning(&format!("no tree for '{}': canonical root missing or table empty", selection));
    }
    let max_level = max_level.unwrap_or(container.settings.max_level);

    output::header(&selection);
    output::info(&tree.to_tree_string(max_level));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_inspect(
    container: &ServiceContainer,
    node: &str,
    args: &SelectionArgs,
    snapshot_file: Option<&Path>,
) -> CliResult<()> {
    let snapshot = match snapshot_file {
        Some(path) => read_snapshot(container, path)?,
        None => {
            let (table, selection) = load_with_selection(container, args)?;
            container.corix.build(&table, &selection)?.snapshot()
        }
    };
    let details = inspect(&snapshot, node)?;
    output::info(&details);
    Ok(())
}

fn read_snapshot(container: &ServiceContainer, path: &Path) -> CliResult<TreeSnapshot> {
    if !container.fs.is_file(path) {
        return Err(ApplicationError::DataFileNotFound(path.to_path_buf()).into());
    }
    let content = container
        .fs
        .read_to_string(path)
        .with_path_context("read snapshot", path)?;
    serde_json::from_str(&content).map_err(|e| {
        ApplicationError::OperationFailed {
            context: format!("parse snapshot {}", path.display()),
            source: Box::new(e),
        }
        .into()
    })
}

#[instrument(skip(container))]
fn cmd_export(container: &ServiceContainer, args: &SelectionArgs, out: Option<&Path>) -> CliResult<()> {
    let (table, selection) = load_with_selection(container, args)?;
    let snapshot = container.corix.build(&table, &selection)?.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize snapshot".into(),
        source: Box::new(e),
    })?;

    match out {
        Some(path) => {
            container
                .fs
                .ensure_parent(path)
                .and_then(|()| container.fs.write(path, &json))
                .map_err(|e| InfraError::write(path, e))?;
            output::success(&format!("{} nodes written to {}", snapshot.nodes.len(), path.display()));
        }
        None => output::info(&json),
    }
    Ok(())
}

fn cmd_selections(container: &ServiceContainer) -> CliResult<()> {
    let table = container.corix.load_table(&container.settings.data_file)?;
    let configured = container.settings.selection.as_deref();
    for selection in table.selections() {
        let column = selection.column();
        output::selection(&column, configured == Some(column.as_str()));
    }
    Ok(())
}

fn cmd_summary(container: &ServiceContainer) -> CliResult<()> {
    let table = container.corix.load_table(&container.settings.data_file)?;
    let summaries = container.corix.summarize(&table)?;
    if summaries.is_empty() {
        output::warning("table has no application/scenario columns");
    }
    for summary in summaries {
        output::score(
            &summary.selection,
            summary.root_score,
            &format!("{} nodes, depth {}", summary.nodes, summary.depth),
        );
    }
    Ok(())
}

fn cmd_sample(container: &ServiceContainer, out: Option<&Path>, force: bool) -> CliResult<()> {
    let path = out.unwrap_or(&container.settings.data_file);
    container.corix.write_sample(path, force)?;
    output::success(&format!("sample data written to {}", path.display()));
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let dir = work_dir(cli)?;
            let mark = |p: &Path| if p.exists() { "" } else { " (missing)" };
            match global_config_path() {
                Some(global) => output::action("global", &format!("{}{}", global.display(), mark(&global))),
                None => output::action("global", &"unavailable"),
            }
            let local = local_config_path(&dir);
            output::action("local", &format!("{}{}", local.display(), mark(&local)));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("no config directory on this platform".into()))?
            } else {
                local_config_path(&work_dir(cli)?)
            };
            if path.exists() {
                return Err(CliError::Usage(format!("{} already exists", path.display())));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::write(parent, e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::write(&path, e))?;
            output::success(&format!("config template written to {}", path.display()));
        }
    }
    Ok(())
}

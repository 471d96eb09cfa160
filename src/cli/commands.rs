//! Command dispatch

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{is_connected, reconstruct_paths, Edge};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the parsed command line.
pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `wikipath --help`".to_string(),
        ));
    };

    match command {
        Commands::Config { command } => {
            let settings = load_settings(cli)?;
            match command {
                ConfigCommands::Show => output::info(&settings.to_toml()?),
                ConfigCommands::Template => output::info(&Settings::template()),
            }
            Ok(())
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Reconstruct { file } => {
            let settings = load_settings(cli)?;
            cmd_reconstruct(&settings, file)
        }
        Commands::Stats => {
            let settings = load_settings(cli)?;
            let graph = ServiceContainer::load_graph(&settings)?;
            print_json(&settings, &graph.stats())
        }
        _ => {
            let settings = load_settings(cli)?;
            let container = ServiceContainer::new(settings)?;
            execute_path_command(&container, command).await
        }
    }
}

/// Settings from config layers, then CLI flags on top.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config_file.as_deref())?;
    if let Some(graph) = &cli.graph {
        settings.graph_file = Some(graph.clone());
    }
    if let Some(max_hops) = cli.max_hops {
        settings.max_hops = max_hops;
    }
    debug!("load_settings: {:?}", settings);
    Ok(settings)
}

#[instrument(level = "debug", skip(container))]
async fn execute_path_command(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    let settings = container.settings.as_ref();
    let paths = &container.paths;

    match command {
        Commands::Length { source, target } => {
            let length = paths.length(source, target).await?;
            output::info(&length);
            Ok(())
        }
        Commands::Path { source, target } => {
            print_json(settings, &paths.single_path(source, target).await?)
        }
        Commands::Random => print_json(settings, &paths.random_path().await?),
        Commands::Paths {
            source,
            target,
            skip,
            limit,
        } => {
            let limit = limit.unwrap_or(settings.default_limit);
            print_json(
                settings,
                &paths.paged_paths(source, target, *skip, limit).await?,
            )
        }
        Commands::All { source, target } => {
            print_json(settings, &paths.all_paths(source, target).await?)
        }
        Commands::SourceType { title } => {
            match paths.resolver().resolve(title).await? {
                Some(kind) => output::info(&kind),
                None => output::warning(&format!("no node titled '{title}'")),
            }
            Ok(())
        }
        other => Err(CliError::InvalidArgs(format!(
            "not a path command: {other:?}"
        ))),
    }
}

fn cmd_reconstruct(settings: &Settings, file: &Path) -> CliResult<()> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| InfraError::io("read edges from stdin", e))?;
        buf
    } else {
        std::fs::read_to_string(file)
            .map_err(|e| InfraError::io(format!("read edges {}", file.display()), e))?
    };
    let edges: Vec<Edge> = serde_json::from_str(&content).map_err(|e| InfraError::EdgeFormat {
        path: file.to_path_buf(),
        message: e.to_string(),
    })?;

    let paths = reconstruct_paths(&edges);
    output::header(&format!("{} edges, {} paths", edges.len(), paths.len()));
    for (i, path) in paths.iter().enumerate() {
        if is_connected(path) {
            output::success(&format!("path {}: {} hops", i + 1, path.len()));
        } else {
            output::failure(&format!("path {}: disconnected", i + 1));
        }
    }
    print_json(settings, &paths)
}

fn print_json<T: Serialize + ?Sized>(settings: &Settings, value: &T) -> CliResult<()> {
    let rendered = if settings.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    output::info(&rendered);
    Ok(())
}

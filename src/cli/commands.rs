//! Command dispatch and implementations

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::RefreshOutcome;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{value_domain, TreeNode};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, InfraResult};

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        Some(Commands::Config { command }) => {
            let settings = load_settings(cli)?;
            execute_config(cli, &settings, command)
        }
        Some(cmd) => {
            let container = create_container(cli)?;
            let loaded = load_table(&container)?;
            match cmd {
                Commands::Tree => cmd_tree(&container),
                Commands::Find { node_id } => cmd_find(&container, node_id),
                Commands::Range { node_id } => cmd_range(&container, node_id.as_deref()),
                Commands::Leaves { node_id, filter } => {
                    cmd_leaves(&container, node_id.as_deref(), filter)
                }
                Commands::Info => cmd_info(&container, &loaded),
                Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

/// Directory searched for `.captree.toml`.
fn config_dir(cli: &Cli) -> InfraResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| InfraError::io("get current directory", e)),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = config_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(data) = &cli.data {
        settings.data_file = data.clone();
    }
    debug!("load_settings: data_file={}", settings.data_file.display());
    Ok(settings)
}

/// Create the service container from CLI options.
fn create_container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?))
}

/// Row and duplicate counts of a successful load.
struct Loaded {
    rows: usize,
    duplicates: usize,
}

#[instrument(level = "debug", skip(container))]
fn load_table(container: &ServiceContainer) -> CliResult<Loaded> {
    match container.session.refresh() {
        RefreshOutcome::Loaded { rows, duplicates } => Ok(Loaded { rows, duplicates }),
        RefreshOutcome::Failed { message } => Err(InfraError::Source { message }.into()),
        RefreshOutcome::AlreadyInProgress => Err(CliError::Usage(
            "table is already being loaded".to_string(),
        )),
    }
}

// ============================================================
// Formatting
// ============================================================

/// Display value of a spend figure; an absent value shows as zero.
pub fn format_value(value: Option<f64>, currency: &str) -> String {
    format!("{}{}", currency, value.unwrap_or(0.0))
}

/// One-line label for a node in tree and path listings.
pub fn node_label(node: &TreeNode, settings: &Settings) -> String {
    let name = if node.is_root() {
        "capabilities"
    } else {
        node.name()
    };
    let mut label = if settings.display.show_node_ids {
        format!("{} ({})", name, node.node_id())
    } else {
        name.to_string()
    };
    if node.is_leaf() {
        label.push_str(": ");
        label.push_str(&format_value(node.value(), &settings.currency));
    }
    label
}

/// Render `node` and everything below it.
pub fn render_tree(node: &TreeNode, settings: &Settings) -> Tree<String> {
    Tree::new(node_label(node, settings)).with_leaves(
        node.children()
            .iter()
            .map(|child| render_tree(child, settings)),
    )
}

// ============================================================
// Table commands
// ============================================================

fn cmd_tree(container: &ServiceContainer) -> CliResult<()> {
    let tree = container.session.tree();
    if tree.children().is_empty() {
        output::warning("no capabilities in table");
        return Ok(());
    }
    output::plain(&render_tree(&tree, &container.settings));
    Ok(())
}

fn cmd_find(container: &ServiceContainer, node_id: &str) -> CliResult<()> {
    let tree = container.session.tree();
    let path = container.session.service().resolve_path(&tree, node_id)?;

    let breadcrumb = path
        .iter()
        .filter(|node| !node.is_root())
        .map(|node| node.name())
        .collect::<Vec<_>>()
        .join(" > ");

    if let Some(node) = path.last() {
        output::header(&node_label(node, &container.settings));
        output::detail(&format!("id: {}", node.id()));
        output::detail(&format!("path: {}", breadcrumb));
        if node.is_branch() {
            output::detail(&format!("children: {}", node.children().len()));
        }
    }
    Ok(())
}

fn cmd_range(container: &ServiceContainer, node_id: Option<&str>) -> CliResult<()> {
    let tree = container.session.tree();
    let node = match node_id {
        Some(id) => container.session.service().resolve(&tree, id)?,
        None => tree.as_ref(),
    };
    let domain = value_domain(node);
    let currency = &container.settings.currency;
    output::plain(&format!(
        "{} - {}",
        format_value(Some(domain.min()), currency),
        format_value(Some(domain.max()), currency)
    ));
    Ok(())
}

fn cmd_leaves(
    container: &ServiceContainer,
    node_id: Option<&str>,
    filter: &[f64],
) -> CliResult<()> {
    let session = &container.session;
    let display = &container.settings.display;

    session.select(node_id);
    if !filter.is_empty() {
        match session.apply_filter_input(filter) {
            Some(applied) => output::labelled("Filter", &applied),
            None => output::warning(&format!(
                "ignoring filter {:?}: outside value range {}",
                filter,
                session.domain()
            )),
        }
    }

    match session.visible_leaves() {
        None => output::placeholder(&display.select_message),
        Some(leaves) if leaves.is_empty() => output::placeholder(&display.no_match_message),
        Some(leaves) => {
            for leaf in &leaves {
                print_card(leaf, &container.settings);
            }
        }
    }
    Ok(())
}

fn print_card(leaf: &TreeNode, settings: &Settings) {
    let title = if settings.display.show_node_ids {
        format!("{} ({})", leaf.name(), leaf.node_id())
    } else {
        leaf.name().to_string()
    };
    let body = format!(
        "Total spend: {}",
        format_value(leaf.value(), &settings.currency)
    );
    output::card(&title, &body);
}

fn cmd_info(container: &ServiceContainer, loaded: &Loaded) -> CliResult<()> {
    let tree = container.session.tree();
    let leaves = tree.iter().filter(|node| node.is_leaf()).count();
    let branches = tree
        .iter()
        .filter(|node| node.is_branch() && !node.is_root())
        .count();

    output::header("captree");
    output::detail(&format!("source: {}", container.source.describe()));
    output::detail(&format!("rows: {}", loaded.rows));
    output::detail(&format!("capabilities: {}", branches));
    output::detail(&format!("leaves: {}", leaves));
    output::detail(&format!("duplicates dropped: {}", loaded.duplicates));
    output::detail(&format!("value range: {}", container.session.domain()));
    Ok(())
}

// ============================================================
// Config commands
// ============================================================

fn execute_config(cli: &Cli, settings: &Settings, cmd: &ConfigCommands) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            output::plain(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            let dir = config_dir(cli)?;
            output::header("Config locations");
            match global_config_path() {
                Some(path) => print_location("global", &path),
                None => output::missing("global: no home directory"),
            }
            print_location("local", &local_config_path(&dir));
            Ok(())
        }
        ConfigCommands::Template => {
            output::plain(&Settings::template());
            Ok(())
        }
    }
}

fn print_location(label: &str, path: &std::path::Path) {
    if path.exists() {
        output::found(&format!("{}: {}", label, path.display()));
    } else {
        output::missing(&format!("{}: {} (not found)", label, path.display()));
    }
}

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "captree", &mut io::stdout());
    Ok(())
}

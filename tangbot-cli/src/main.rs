#![forbid(unsafe_code)]

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use tangbot_tree::{
    nodes::get_node_definition, Capabilities, LayoutParams, NodeCatalog, NodeDefinition, NodeId,
    TreeStore,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TRACING_TARGET: &str = "tangbot_cli";

/// Behavior tree authoring tool.
///
/// Reads a tree document (a JSON object mapping node ids to node records),
/// applies an edit or a layout pass and writes the resulting document.
#[derive(Debug, Parser)]
#[command(name = "tangbot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lay out every tree in a document, or only one subtree.
    Layout {
        #[command(flatten)]
        document: DocumentArgs,

        /// Only lay out the subtree rooted at this node, keeping it in place.
        #[arg(long)]
        root: Option<String>,
    },
    /// Move a node under a new parent.
    Place {
        #[command(flatten)]
        document: DocumentArgs,

        #[arg(long)]
        parent: String,

        #[arg(long)]
        child: String,

        /// Accept replacing the current child of a decorator.
        #[arg(short, long)]
        yes: bool,
    },
    /// Validate a document without writing anything.
    Check {
        /// Document to read, `-` for stdin.
        input: PathBuf,
    },
    /// List the known node kinds.
    Catalog {
        /// Only describe this kind, by its document name (e.g. `RetryNode`).
        kind: Option<String>,

        /// Print the catalog as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct DocumentArgs {
    /// Document to read, `-` for stdin.
    input: PathBuf,

    /// Where to write the result. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the written document.
    #[arg(long)]
    pretty: bool,
}

/// Tree layout spacing.
#[derive(Debug, Clone, Args)]
struct LayoutArgs {
    #[arg(long, global = true, env = "TANGBOT_NODE_WIDTH", default_value_t = 150.0)]
    node_width: f64,

    #[arg(long, global = true, env = "TANGBOT_NODE_HEIGHT", default_value_t = 100.0)]
    node_height: f64,

    /// Gap between depths, along x.
    #[arg(long, global = true, env = "TANGBOT_HORIZONTAL_SPACING", default_value_t = 150.0, allow_negative_numbers = true)]
    horizontal_spacing: f64,

    /// Gap between siblings, along y. Negative values tighten rows.
    #[arg(long, global = true, env = "TANGBOT_VERTICAL_SPACING", default_value_t = -40.0, allow_negative_numbers = true)]
    vertical_spacing: f64,
}

impl From<&LayoutArgs> for LayoutParams {
    fn from(args: &LayoutArgs) -> Self {
        Self {
            node_width: args.node_width,
            node_height: args.node_height,
            horizontal_spacing: args.horizontal_spacing,
            vertical_spacing: args.vertical_spacing,
        }
    }
}

fn main() {
    let Err(error) = run() else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(target: TRACING_TARGET, error = %format!("{error:#}"), "command failed");
    } else {
        eprintln!("Error: {error:#}");
    }
    process::exit(1);
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let params = LayoutParams::from(&cli.layout);
    tracing::debug!(target: TRACING_TARGET, ?params, "layout parameters");

    match cli.command {
        Commands::Layout { document, root } => {
            let mut store = load(&document.input, params)?;
            if let Some(root) = root {
                store
                    .apply_layout(Some(&NodeId(root)))
                    .context("failed to lay out subtree")?;
            }
            write_document(&store, document.output.as_deref(), document.pretty)
        }
        Commands::Place {
            document,
            parent,
            child,
            yes,
        } => {
            let mut store = load(&document.input, params)?;
            let parent = NodeId(parent);
            let child = NodeId(child);

            let placement = store.can_place(&parent, &child)?;
            if !placement.can_place {
                bail!("{}", placement.message);
            }
            if placement.should_confirm && !yes {
                bail!("{} (pass --yes to confirm)", placement.message);
            }

            store
                .place_node(&parent, &child)
                .with_context(|| format!("failed to place '{child}' under '{parent}'"))?;
            if let Some(displaced) = placement.displaced {
                tracing::info!(target: TRACING_TARGET, node = %displaced, "node displaced to a new root");
            }
            write_document(&store, document.output.as_deref(), document.pretty)
        }
        Commands::Check { input } => {
            let store = load(&input, params)?;
            println!(
                "ok: {} nodes, {} roots",
                store.len(),
                store.roots().count()
            );
            Ok(())
        }
        Commands::Catalog { kind, json } => {
            let definitions = match kind {
                Some(kind) => vec![get_node_definition(&kind)
                    .ok_or_else(|| anyhow!("unknown node kind '{kind}'"))?],
                None => NodeCatalog::builtin().iter().collect(),
            };
            print_catalog(&definitions, json)
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("failed to create env filter: {e}"))?;

    // Documents go to stdout, so logs stay on stderr.
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        return io::read_to_string(io::stdin()).context("failed to read document from stdin");
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load(path: &Path, params: LayoutParams) -> anyhow::Result<TreeStore> {
    let document = read_input(path)?;
    let mut store = TreeStore::new().with_layout_params(params);
    store
        .load_tree(&document)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(store)
}

fn write_document(store: &TreeStore, output: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let document = if pretty {
        store.to_json_pretty()
    } else {
        store.to_json()
    }
    .context("failed to serialize tree")?;

    match output {
        Some(path) => {
            fs::write(path, document + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(target: TRACING_TARGET, path = %path.display(), nodes = store.len(), "document written");
        }
        None => println!("{document}"),
    }
    Ok(())
}

fn catalog_entry(def: &dyn NodeDefinition) -> serde_json::Value {
    let inputs: Vec<_> = def
        .inputs()
        .iter()
        .map(|input| {
            serde_json::json!({
                "name": input.name,
                "required": input.required,
                "description": input.description,
            })
        })
        .collect();

    serde_json::json!({
        "type": def.kind_name(),
        "displayName": def.display_name(),
        "category": def.category().display_name(),
        "description": def.description(),
        "canHaveChildren": def.can_have_children(),
        "isDecorator": def.is_decorator(),
        "maxChildren": Capabilities::of(def).max_children(),
        "inputs": inputs,
    })
}

fn print_catalog(definitions: &[&'static dyn NodeDefinition], json: bool) -> anyhow::Result<()> {
    if json {
        let entries: Vec<_> = definitions.iter().map(|def| catalog_entry(*def)).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).context("failed to serialize catalog")?
        );
        return Ok(());
    }

    for def in definitions {
        let inputs: Vec<_> = def.inputs().iter().map(|input| input.name).collect();
        println!(
            "{:<16} {:<11} {:<40} {}",
            def.kind_name(),
            def.category().display_name(),
            inputs.join(", "),
            def.description()
        );
    }
    Ok(())
}

//! mlmd-lineage CLI — print the lineage columns around an artifact.
//!
//! Loads a metadata store snapshot, runs the two-hop traversal for the
//! target, and optionally walks on through further artifacts the way a user
//! clicking lineage cards would.

use anyhow::{bail, Context};
use clap::Parser;
use lineage_core::{Artifact, ArtifactId, LineageResource};
use lineage_graph::{
    Breadcrumbs, InMemoryStore, LineageConfig, LineageGraph, LineageLayout, LineageView, Retarget,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mlmd-lineage", version = env!("CARGO_PKG_VERSION"), about = "Lineage explorer — producers and consumers two hops around an artifact")]
struct Cli {
    /// Metadata store snapshot (.json, .yaml or .yml)
    #[arg(short, long, required_unless_present = "print_config")]
    store: Option<PathBuf>,

    /// Target artifact id
    #[arg(short, long, required_unless_present = "print_config")]
    target: Option<ArtifactId>,

    /// Lineage config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Artifacts to select next, in order, as if their cards were clicked
    #[arg(long, num_args = 1..)]
    follow: Vec<ArtifactId>,

    /// Emit the final layout as JSON
    #[arg(long)]
    json: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn details_route(resource: &LineageResource, type_name: &str) -> String {
    format!("/{}s/{}/{}", resource.kind(), type_name, resource.id())
}

/// Find `id` among the artifacts currently shown, so a click can be replayed.
fn shown_artifact(graph: &LineageGraph, id: ArtifactId) -> Option<Artifact> {
    graph
        .input_artifacts
        .iter()
        .chain(&graph.output_artifacts)
        .find(|a| a.id == id)
        .cloned()
}

fn print_layout(layout: &LineageLayout) {
    println!("=== Lineage for artifact {} ===", layout.target_id);
    for column in &layout.columns {
        let title = if column.title.is_empty() {
            column.column_type.code()
        } else {
            column.title.as_str()
        };
        println!("\n[{}] {}", column.column_type, title);
        if column.cards.is_empty() {
            println!("  (none)");
        }
        for card in &column.cards {
            let marker = if card.is_target { " *" } else { "" };
            println!("  {}{}", card.title, marker);
            for row in &card.rows {
                let prev = if row.prev { "<" } else { " " };
                let next = if row.next { ">" } else { " " };
                let name = row.resource.name().unwrap_or("-");
                println!(
                    "    {} {} #{} {} {}",
                    prev,
                    row.resource.kind(),
                    row.resource.id(),
                    name,
                    next
                );
                println!("        {}", row.route);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mlmd_lineage=info,lineage_graph=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LineageConfig::try_load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LineageConfig::default(),
    };

    if cli.print_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let (Some(store_path), Some(target)) = (cli.store, cli.target) else {
        bail!("--store and --target are required");
    };

    let store = InMemoryStore::from_path(&store_path)
        .with_context(|| format!("loading store snapshot {}", store_path.display()))?;
    let view = LineageView::new(Arc::new(store), Arc::new(details_route), config);

    let Retarget::Applied(mut layout) = view.retarget(target).await? else {
        bail!("initial traversal for artifact {} did not commit", target);
    };
    let Some(initial) = view.current() else {
        bail!("no lineage committed for artifact {}", target);
    };
    let view = view.with_history(Box::new(Breadcrumbs::new(initial.target.clone())));

    for id in &cli.follow {
        let Some(graph) = view.current() else { break };
        let Some(artifact) = shown_artifact(&graph, *id) else {
            bail!("artifact {} is not an input or output of artifact {}", id, graph.target.id);
        };
        tracing::debug!(from = graph.target.id, to = id, "following card");
        match view.select_from_card(&artifact).await? {
            Retarget::Applied(next) => layout = next,
            Retarget::Superseded => bail!("selection of artifact {} was superseded", id),
            Retarget::NotSelectable => bail!("artifact {} cannot be selected", id),
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    let trail = view.history().await;
    if trail.len() > 1 {
        let path: Vec<String> = trail.iter().map(|a| a.id.to_string()).collect();
        println!("Path: {}\n", path.join(" → "));
    }
    print_layout(&layout);
    Ok(())
}

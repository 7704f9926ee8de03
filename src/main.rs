use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use duonav::NavController;
use duonav::core::config::{self, CliOverrides, ControllerConfig, DuonavConfig, ExitPolicy};
use duonav::core::snapshot::{load_snapshot, save_snapshot};
use duonav::graph::inflater::inflate_file;
use duonav::navigator::NavigatorRegistry;
use duonav::navigator::navigators::{HostNavigator, NoopNavigator, OverlayNavigator};
use duonav::replay::{parse_script, run_script};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "duonav", about = "Replay navigation scripts against a dual-pane navigation graph")]
struct Args {
    /// Script to replay (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Navigation graph TOML file
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Start at the destination this route resolves to
    #[arg(long)]
    deep_link: Option<String>,

    /// What popping the last entry does: refuse or exit_host
    #[arg(long)]
    exit_policy: Option<ExitPolicy>,

    /// error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Restore the saved snapshot for this graph before replaying
    #[arg(long)]
    restore: bool,

    /// Save a snapshot after replaying
    #[arg(long)]
    save: bool,
}

fn registry() -> io::Result<NavigatorRegistry> {
    let mut registry = NavigatorRegistry::new();
    registry.register("host", HostNavigator::new()).map_err(io::Error::other)?;
    registry.register("dialog", OverlayNavigator::new()).map_err(io::Error::other)?;
    registry.register("noop", NoopNavigator).map_err(io::Error::other)?;
    Ok(registry)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("duonav: {e}, using defaults");
        DuonavConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            exit_policy: args.exit_policy,
            log_level: args.log_level.clone(),
            snapshot_dir: args.snapshot_dir.clone(),
            graph_file: args.graph.clone(),
        },
    );

    // Initialize file logger - writes to duonav.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("duonav.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    let graph_file = resolved
        .graph_file
        .clone()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no graph file given (--graph or DUONAV_GRAPH)"))?;
    let graph = inflate_file(&graph_file).map_err(io::Error::other)?;
    log::info!("duonav starting with graph {} from {}", graph.id(), graph_file.display());

    let graph_id = graph.id().clone();
    let mut controller = NavController::new(graph, registry()?, ControllerConfig::from(&resolved));
    controller.set_exit_handler(|| log::info!("Host asked to exit"));

    let snapshot = if args.restore {
        load_snapshot(&resolved.snapshot_dir, &graph_id)?
    } else {
        None
    };
    match (snapshot, &args.deep_link) {
        (Some(snapshot), _) => controller.restore(&snapshot),
        (None, Some(route)) => controller.start_with_deep_link(route),
        (None, None) => controller.start(),
    }
    .map_err(io::Error::other)?;

    let mut source = String::new();
    match &args.script {
        Some(path) => source = std::fs::read_to_string(path)?,
        None => {
            io::stdin().read_to_string(&mut source)?;
        }
    }
    let steps = parse_script(&source).map_err(io::Error::other)?;

    let mut stdout = io::stdout();
    run_script(&mut controller, &steps, &mut stdout)
        .await
        .map_err(io::Error::other)?;

    if args.save || resolved.autosave {
        let path = save_snapshot(&resolved.snapshot_dir, &controller.capture())?;
        println!("saved snapshot to {}", path.display());
    }
    Ok(())
}

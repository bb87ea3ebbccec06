use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use evac_sim::simulation::{
    demo_world, export_to_dir, load_world_file, Node, PolicyKind, RoadNetwork, SimConfig,
    SimWorld, CAR_LENGTH, DEFAULT_FILL_FRACTION, DEPARTURE_MEAN, MAX_ITERATIONS,
    MEAN_TRAVEL_TIME, MEAN_WAITING_TIME, WEST_TOLERANCE,
};

#[derive(Parser)]
#[command(name = "evac_sim")]
#[command(about = "Discrete-event evacuation traffic simulation")]
struct Cli {
    /// World file of Street/Parking records; runs the built-in town when omitted
    #[arg(long)]
    world: Option<PathBuf>,

    /// Routing policy applied at every intersection
    #[arg(long, value_enum, default_value_t = PolicyKind::NearestExit)]
    policy: PolicyKind,

    /// Fraction of parking spaces holding a departing vehicle
    #[arg(long, default_value_t = DEFAULT_FILL_FRACTION)]
    fill: f64,

    /// Exit node as "x,y"; repeat for several exits
    #[arg(long = "exit", value_parser = parse_node)]
    exits: Vec<Node>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of processed events before the run is halted
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    max_iterations: u64,

    /// Vehicle footprint used to derive segment capacity
    #[arg(long, default_value_t = CAR_LENGTH)]
    car_length: f64,

    /// Mean gap between departures from one lot
    #[arg(long, default_value_t = DEPARTURE_MEAN)]
    departure_mean: f64,

    /// Time to traverse one segment
    #[arg(long, default_value_t = MEAN_TRAVEL_TIME)]
    travel_time: f64,

    /// Time a blocked vehicle waits before retrying
    #[arg(long, default_value_t = MEAN_WAITING_TIME)]
    waiting_time: f64,

    /// How far west a no-left-turn move may head
    #[arg(long, default_value_t = WEST_TOLERANCE)]
    west_tolerance: f64,

    /// Directory to write capacity, exit and path CSVs into
    #[arg(long)]
    export: Option<PathBuf>,
}

fn parse_node(s: &str) -> Result<Node, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Node::new(x, y))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,evac_sim=info"))
        .init();

    let cli = Cli::parse();

    let (records, mut exits) = match &cli.world {
        Some(path) => {
            let records = load_world_file(path)
                .with_context(|| format!("Failed to load world file {}", path.display()))?;
            (records, Vec::new())
        }
        None => {
            println!("No world file given, running the built-in town");
            demo_world()
        }
    };
    if !cli.exits.is_empty() {
        exits = cli.exits.clone();
    }

    let config = SimConfig {
        car_length: cli.car_length,
        departure_mean: cli.departure_mean,
        travel_time: cli.travel_time,
        waiting_time: cli.waiting_time,
        west_tolerance: cli.west_tolerance,
        fill_fraction: cli.fill,
        max_iterations: cli.max_iterations,
        exits,
    };

    let network =
        RoadNetwork::from_records(&records, config.car_length).context("Invalid topology")?;

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(network, config, cli.policy, seed),
        None => SimWorld::new(network, config, cli.policy),
    }
    .context("Invalid simulation configuration")?;

    world.seed_departures();
    world.run().context("Simulation aborted")?;

    println!();
    world.print_summary();

    if let Some(dir) = &cli.export {
        export_to_dir(world.metrics(), dir)
            .with_context(|| format!("Failed to export metrics to {}", dir.display()))?;
    }

    Ok(())
}

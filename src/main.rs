use std::path::PathBuf;

use clap::Parser;

use evo_grid_sim::config::Config;
use evo_grid_sim::error::{EvoError, EvoResult};
use evo_grid_sim::output::NullOutput;
use evo_grid_sim::simulation::Simulation;
use evo_grid_sim::survival::CornerSurvival;

/// Runs a headless evolutionary grid simulation.
#[derive(Parser, Debug)]
#[command(name = "evo-sim", about = "evolutionary grid simulator")]
struct Cli {
    /// Output folder, created if absent. Reserved for a future renderer —
    /// this binary does not write to it itself.
    folder: PathBuf,

    /// Optional TOML config file; CLI flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'g', long)]
    generations: Option<usize>,

    #[arg(short, long)]
    steps: Option<usize>,

    #[arg(short, long)]
    organisms: Option<usize>,

    #[arg(short = 'e', long = "genes")]
    genes: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> EvoResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| EvoError::Configuration(format!("reading {}: {e}", path.display())))?;
            Config::from_toml_str(&text)?
        }
        None => Config::default(),
    };

    if let Some(v) = cli.generations {
        config.generations = v;
    }
    if let Some(v) = cli.steps {
        config.steps = v;
    }
    if let Some(v) = cli.organisms {
        config.organisms = v;
    }
    if let Some(v) = cli.genes {
        config.genes = v;
    }
    config.validate()?;

    std::fs::create_dir_all(&cli.folder)
        .map_err(|e| EvoError::Configuration(format!("creating {}: {e}", cli.folder.display())))?;

    let seed = cli.seed.unwrap_or(0);
    let survival = Box::new(CornerSurvival { distance: 20 });
    let mut sim = Simulation::new(config, survival, Box::new(NullOutput), seed)?;
    sim.run()
}

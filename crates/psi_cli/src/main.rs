use anyhow::Context;
use clap::Parser;
use psi_agent::{BotReport, PsiBot};
use psi_core::{NeedType, PsiConfig};
use psi_world::{Island, ResourceType};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "psi", author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config; missing files fall back to defaults
    #[arg(short, long, default_value = "psi.toml")]
    config: String,

    /// Number of ticks to simulate
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Seed for island generation and the agent's random choices
    #[arg(short, long)]
    seed: Option<u64>,

    /// Time step per tick
    #[arg(long)]
    dt: Option<f64>,

    /// Island width in tiles
    #[arg(long)]
    width: Option<usize>,

    /// Island height in tiles
    #[arg(long)]
    height: Option<usize>,

    /// Break exact motive ties at random instead of first-listed
    #[arg(long)]
    random_ties: bool,

    /// Print the final state as JSON instead of a summary
    #[arg(long)]
    report: bool,

    /// Log every decision
    #[arg(short, long)]
    verbose: bool,

    /// Log tick internals
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn apply(&self, config: &mut PsiConfig) {
        if let Some(ticks) = self.ticks {
            config.simulation.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(dt) = self.dt {
            config.simulation.dt = dt;
        }
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if self.random_ties {
            config.selector.tie_break_random = true;
        }
    }
}

#[derive(Serialize)]
struct RunReport {
    seed: u64,
    ticks: u64,
    dt: f64,
    width: usize,
    height: usize,
    resources_left: ResourceCounts,
    bot: BotReport,
}

#[derive(Serialize)]
struct ResourceCounts {
    food: usize,
    water: usize,
    shelter: usize,
}

impl ResourceCounts {
    fn of(island: &Island) -> Self {
        Self {
            food: island.tiles_with_resource(ResourceType::Food).count(),
            water: island.tiles_with_resource(ResourceType::Water).count(),
            shelter: island.tiles_with_resource(ResourceType::Shelter).count(),
        }
    }
}

fn init_tracing(args: &Args) {
    let level = if args.debug {
        tracing::Level::DEBUG
    } else if args.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    // stdout is reserved for the summary / report
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(bot: &PsiBot, island: &Island, config: &PsiConfig) {
    let stats = bot.stats();
    println!(
        "PSI island run: seed {}, {}x{}, {} ticks of {}",
        config.simulation.seed,
        config.world.width,
        config.world.height,
        stats.ticks,
        config.simulation.dt
    );
    println!(
        "Acted on {} ticks, idle on {}, {} failed",
        stats.ticks - stats.idle_ticks,
        stats.idle_ticks,
        stats.failed_actions
    );
    for (action, count) in &stats.actions {
        println!("  {action:<12} {count}");
    }
    println!("Final position {}", bot.position());

    println!("Needs (level / bedarf / activity):");
    for need in NeedType::ALL {
        let tank = bot.needs().tank(need);
        let marker = if tank.is_critical() { "  CRITICAL" } else { "" };
        println!(
            "  {:<12} {:.3} / {:.3} / {:.3}{}",
            need.name(),
            tank.current_level(),
            tank.bedarf(),
            bot.motivators().get(need).activity(),
            marker
        );
    }

    let left = ResourceCounts::of(island);
    println!(
        "Resources left: food {}, water {}, shelter {}",
        left.food, left.water, left.shelter
    );
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let mut config = PsiConfig::load_or_default(&args.config);
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let mut island = Island::generate(config.world.width, config.world.height, config.simulation.seed);
    let mut bot = PsiBot::spawn_at_start(&mut island, &config).context("Failed to place the agent")?;
    info!(agent = %bot.id(), position = %bot.position(), "simulation starting");

    for _ in 0..config.simulation.ticks {
        bot.tick(&mut island, config.simulation.dt);
    }

    if args.report {
        let report = RunReport {
            seed: config.simulation.seed,
            ticks: config.simulation.ticks,
            dt: config.simulation.dt,
            width: config.world.width,
            height: config.world.height,
            resources_left: ResourceCounts::of(&island),
            bot: bot.report(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&bot, &island, &config);
    }

    Ok(())
}

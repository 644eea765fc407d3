use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gachatables::{GachaMaster, Simulator};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pull from a banner and report observed vs configured rates.
#[derive(Parser)]
struct Args {
    #[arg(long, env = "GACHA_CATALOG", default_value = "demos/data/catalog.yaml")]
    catalog: PathBuf,
    #[arg(long, env = "GACHA_BANNERS", default_value = "demos/data/gacha.yaml")]
    banners: PathBuf,
    /// Banner id; defaults to the newest non-revival banner
    #[arg(long)]
    banner: Option<u32>,
    #[arg(short, long, default_value_t = 10)]
    pulls: usize,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gachatables=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let master = GachaMaster::load(&args.catalog, &args.banners)
        .with_context(|| format!("loading {}", args.banners.display()))?;
    let banner = master.banner(args.banner).context("no banners defined")?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut sim = Simulator::new(banner, rng);

    println!("{} ({})", banner.definition().name.secondary, banner.id());
    let mut hist: HashMap<_, u64> = HashMap::default();
    for pull in sim.pull(args.pulls) {
        *hist.entry(pull.id).or_default() += 1;
    }

    let mut values: Vec<_> = hist.into_iter().collect();
    values.sort_by(|(_, ca), (_, cb)| cb.cmp(ca));
    for (id, count) in values {
        let item = master.catalog().get(id).context("drawn id not in catalog")?;
        let mark = if banner.is_pickup(id) { " PU" } else { "" };
        println!("{count: >7} ★{} {}{mark}", item.rarity, item.name.secondary);
    }

    println!();
    for rarity in (3..=6).rev() {
        if let Some(stats) = sim.rarity_stats(rarity) {
            println!(
                "★{rarity}: {:.2}% (rate {:.2}%)",
                stats.observed * 100.0,
                stats.expected * 100.0
            );
        }
    }
    if let Some(stats) = sim.pickup_stats().filter(|_| banner.pickups().next().is_some()) {
        println!(
            "PU: {:.2}% (rate {:.2}%)",
            stats.observed * 100.0,
            stats.expected * 100.0
        );
    }

    Ok(())
}

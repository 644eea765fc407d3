use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gachatables::GachaMaster;

/// Print every banner's rate list.
#[derive(Parser)]
struct Args {
    #[arg(long, env = "GACHA_CATALOG", default_value = "demos/data/catalog.yaml")]
    catalog: PathBuf,
    #[arg(long, env = "GACHA_BANNERS", default_value = "demos/data/gacha.yaml")]
    banners: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let master = GachaMaster::load(&args.catalog, &args.banners).context("loading gacha data")?;

    for banner in master.banners() {
        let def = banner.definition();
        let revival = if def.revival { " [rerun]" } else { "" };
        println!("#{} {} {}..{}{revival}", def.id, def.name.secondary, def.start, def.end);

        for id in banner.pickups() {
            let item = master.catalog().get(id).context("pickup not in catalog")?;
            let rate = banner.table().rate_percent(id).unwrap_or_default();
            println!("  PU ★{} {}: {rate}%", item.rarity, item.name.secondary);
        }

        for rarity in (3..=6).rev() {
            let Some(rate) = banner.rarity_rate(rarity) else {
                continue;
            };
            let names: Vec<_> = banner
                .items_of_rarity(master.catalog(), rarity)
                .iter()
                .map(|item| item.name.secondary.as_str())
                .collect();
            println!("  ★{rarity}: {:.2}%  {}", rate * 100.0, names.join(" / "));
        }
        println!();
    }

    Ok(())
}

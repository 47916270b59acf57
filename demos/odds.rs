//! Print the empirical drop distribution of a case.
//!
//! ```text
//! cargo run --example odds -- demos/data/cases.json 命运武器箱
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use casedrops::{Catalog, ItemRoller, Labeled};

const DRAWS: u32 = 1_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "demos/data/cases.json".to_string());
    let catalog = Catalog::read(Path::new(&path))?;
    let case = match args.next() {
        Some(name) => catalog.get(&name).ok_or(format!("no case named {name}"))?,
        None => catalog.cases().first().ok_or("catalog is empty")?,
    };

    let roller = ItemRoller::new()?;
    let mut rng = rand::rng();
    let mut by_item: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_wear: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut stattrak = 0u64;
    for _ in 0..DRAWS {
        let item = roller.roll(case, &mut rng);
        if item.name.starts_with(casedrops::roller::STATTRAK_PREFIX) {
            stattrak += 1;
        }
        *by_wear.entry(item.wear_level.label()).or_default() += 1;
        *by_item.entry(item.name).or_default() += 1;
    }

    println!("{} ({DRAWS} draws)", case.name());
    let mut values: Vec<(String, u64)> = by_item.into_iter().collect();
    values.sort_by(|(_, ca), (_, cb)| cb.cmp(ca));
    for (name, count) in values {
        println!("{count: >8} {name}");
    }
    println!();
    for (level, count) in by_wear {
        println!("{count: >8} {level}");
    }
    println!("{stattrak: >8} StatTrak");

    Ok(())
}


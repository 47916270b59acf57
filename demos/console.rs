//! Line-based console front end.
//!
//! Each stdin line is `<user> <command> [args]`, where command is one of
//! `open`, `inventory`, `purge` or `list`.
//!
//! ```text
//! CASEDROPS_DATA_DIR=demos/data cargo run --example console
//! 10001 open 命运武器箱 5
//! 10001 inventory
//! ```

use std::io::Write;

use casedrops::{CaseOpener, Settings, render};
use chrono::Local;
use env_logger::{Env, Target};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            writeln!(
                buf,
                "[{ts} {} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .init();

    let settings = Settings::load()?;
    let opener = CaseOpener::from_settings(settings)?;
    log::info!("{} cases loaded", opener.catalog().len());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (user, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let (command, args) = rest
            .trim_start()
            .split_once(char::is_whitespace)
            .unwrap_or((rest.trim_start(), ""));
        let nickname = format!("用户{user}");

        let reply = match command {
            "open" => render::open_message(&opener.open(user, args).await, &nickname),
            "inventory" => {
                render::inventory_message(opener.inventory(user).await.as_ref(), &nickname)
            }
            "purge" => render::purge_message(opener.purge(user).await),
            _ => render::menu_message(opener.catalog()),
        };
        println!("{reply}\n");
    }
    Ok(())
}

mod ui;

use anyhow::Context;
use creature_battle::battle::{BattleConfig, BattleSimulator};
use creature_battle::catalog::{load_catalog, Catalog};
use creature_battle::replay::ReplayCursor;
use creature_battle::validate::validate_matchup;
use creature_battle::{init_tracing, resolve_catalog_path};
use std::env;
use std::path::PathBuf;
use ui::ViewerInput;

struct ViewerOptions {
    catalog_path: PathBuf,
    team1: Option<String>,
    team2: Option<String>,
    battle: BattleConfig,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let opts = parse_args(env::args().skip(1))?;
    let catalog = load_catalog(&opts.catalog_path).context("Failed to load the team catalog")?;
    run_viewer(&opts, &catalog)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<ViewerOptions> {
    let mut catalog_path: Option<PathBuf> = None;
    let mut team1 = None;
    let mut team2 = None;
    let mut battle = BattleConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--catalog" => {
                catalog_path = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--catalog requires a path"))?,
                );
            }
            "--team1" => {
                team1 = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--team1 requires a team id"))?,
                );
            }
            "--team2" => {
                team2 = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--team2 requires a team id"))?,
                );
            }
            "--max-rounds" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-rounds requires a number"))?;
                battle.max_rounds = val.parse()?;
                if battle.max_rounds == 0 {
                    anyhow::bail!("--max-rounds must be > 0");
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                print_usage();
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
    }

    Ok(ViewerOptions {
        catalog_path: resolve_catalog_path(catalog_path),
        team1,
        team2,
        battle,
    })
}

fn run_viewer(opts: &ViewerOptions, catalog: &Catalog) -> anyhow::Result<()> {
    if catalog.teams.len() < 2 {
        anyhow::bail!("the catalog needs at least two teams to stage a battle");
    }
    let team1 = match &opts.team1 {
        Some(id) => catalog.team(id)?,
        None => &catalog.teams[ui::prompt_team("team 1", &catalog.teams)?],
    };
    let team2 = match &opts.team2 {
        Some(id) => catalog.team(id)?,
        None => &catalog.teams[ui::prompt_team("team 2", &catalog.teams)?],
    };
    validate_matchup(team1, team2)?;

    let simulator = BattleSimulator::new(&catalog.effectiveness, &catalog.categories)
        .with_config(opts.battle.clone());
    let result = simulator.simulate(team1, team2);
    tracing::debug!(rounds = result.rounds.len(), "battle ready for replay");

    let mut cursor = ReplayCursor::new(&result);
    loop {
        ui::render(&result, &cursor, &catalog.categories);
        match ui::prompt(cursor.can_go_previous(), cursor.can_go_next())? {
            ViewerInput::Next => {
                cursor.next();
            }
            ViewerInput::Previous => {
                cursor.previous();
            }
            ViewerInput::Quit => break,
        }
    }
    Ok(())
}

fn print_usage() {
    eprintln!(
        "Usage: battle-viewer [--catalog data/catalog.json] [--team1 ID] [--team2 ID] [--max-rounds N]"
    );
}

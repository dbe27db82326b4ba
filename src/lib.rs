//! Deterministic team battles between collectible creatures.
//!
//! The entry point is [`battle::simulate_battle`]; lookups for category
//! effectiveness and category names are injected through
//! [`effectiveness::EffectivenessTable`] and [`category::CategoryResolver`].

pub mod battle;
pub mod battle_log;
pub mod catalog;
pub mod category;
pub mod effectiveness;
pub mod error;
pub mod matrix;
pub mod model;
pub mod replay;
pub mod validate;

use crate::battle::{BattleConfig, BattleSimulator};
use crate::battle_log::BattleLog;
use crate::catalog::{load_catalog, Catalog};
use crate::matrix::{compute_matrix, row_wins};
use crate::validate::validate_matchup;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no `--catalog` flag is given.
pub const CATALOG_ENV: &str = "CREATURE_BATTLE_CATALOG";
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Simulate { team1: String, team2: String },
    Matrix,
    Teams,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub command: Command,
    pub catalog_path: PathBuf,
    pub battle: BattleConfig,
    pub output_path: Option<PathBuf>,
    pub show_log: bool,
}

/// Catalog path from the flag, then the environment, then the default.
pub fn resolve_catalog_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(CATALOG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let catalog = load_catalog(&opts.catalog_path)?;
    match &opts.command {
        Command::Teams => {
            print!("{}", render_team_list(&catalog));
            Ok(())
        }
        Command::Simulate { team1, team2 } => run_simulate(&catalog, team1, team2, &opts),
        Command::Matrix => run_matrix(&catalog, &opts),
    }
}

fn run_simulate(catalog: &Catalog, team1: &str, team2: &str, opts: &CliOptions) -> anyhow::Result<()> {
    let team1 = catalog.team(team1)?;
    let team2 = catalog.team(team2)?;
    validate_matchup(team1, team2)?;

    let simulator = BattleSimulator::new(&catalog.effectiveness, &catalog.categories)
        .with_config(opts.battle.clone());
    let result = simulator.simulate(team1, team2);

    if opts.show_log {
        for line in BattleLog::from_result(&result, &catalog.categories).lines() {
            println!("{line}");
        }
    }
    println!(
        "{} defeats {} after {} rounds",
        result.winner_team().name,
        result.team(result.winner.opponent()).name,
        result.rounds.len()
    );
    if let Some(path) = &opts.output_path {
        write_json(path, &result)?;
        println!("Wrote battle result to {}", path.display());
    }
    Ok(())
}

fn run_matrix(catalog: &Catalog, opts: &CliOptions) -> anyhow::Result<()> {
    if catalog.teams.len() < 2 {
        anyhow::bail!("matrix needs at least two teams in the catalog");
    }
    let matrix = compute_matrix(
        &catalog.teams,
        &catalog.effectiveness,
        &catalog.categories,
        &opts.battle,
    );
    for (team, wins) in catalog.teams.iter().zip(row_wins(&matrix)) {
        println!("{:<24} {wins} wins", team.name);
    }
    if let Some(path) = &opts.output_path {
        matrix::write_csv(&catalog.teams, &matrix, path)?;
        println!(
            "Wrote {}x{} matrix to {}",
            matrix.len(),
            matrix.first().map(|r| r.len()).unwrap_or(0),
            path.display()
        );
    }
    Ok(())
}

pub fn render_team_list(catalog: &Catalog) -> String {
    let mut out = String::new();
    for team in &catalog.teams {
        out.push_str(&format!(
            "{}  {} (power {}, {} creatures)\n",
            team.id,
            team.name,
            team.power(),
            team.creatures.len()
        ));
    }
    out
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(value).context("Failed to serialize battle result")?;
    std::fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

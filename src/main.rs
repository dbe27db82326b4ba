use creature_battle::battle::BattleConfig;
use creature_battle::{init_tracing, resolve_catalog_path, run, CliOptions, Command};
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "Usage: creature-battle <simulate --team1 ID --team2 ID | matrix | teams> \
[--catalog catalog.json] [--max-rounds N] [--output FILE] [--log]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut args = env::args().skip(1);
    let command_name = match args.next() {
        Some(name) => name,
        None => usage(),
    };
    let mut team1: Option<String> = None;
    let mut team2: Option<String> = None;
    let mut catalog_path: Option<PathBuf> = None;
    let mut battle = BattleConfig::default();
    let mut output_path: Option<PathBuf> = None;
    let mut show_log = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
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
            "--catalog" => {
                catalog_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--catalog requires a path (e.g. --catalog data/catalog.json)")
                })?);
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
            "--output" => {
                output_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output result.json)")
                })?);
            }
            "--log" => show_log = true,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    let command = match command_name.as_str() {
        "simulate" => Command::Simulate {
            team1: team1.ok_or_else(|| anyhow::anyhow!("simulate requires --team1"))?,
            team2: team2.ok_or_else(|| anyhow::anyhow!("simulate requires --team2"))?,
        },
        "matrix" => Command::Matrix,
        "teams" => Command::Teams,
        "--help" | "-h" => usage(),
        other => anyhow::bail!("Unknown command {other} (use simulate, matrix or teams)"),
    };

    Ok(CliOptions {
        command,
        catalog_path: resolve_catalog_path(catalog_path),
        battle,
        output_path,
        show_log,
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let opts = parse_args()?;
    run(opts)
}

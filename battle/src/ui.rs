use anyhow::Result;
use creature_battle::battle::{BattleResult, BattleRound, RoundOutcome, Side, Termination};
use creature_battle::category::{category_display_name, CategoryResolver};
use creature_battle::model::Team;
use creature_battle::replay::{life_percentage, LifeBand, ReplayCursor};
use std::io::{self, Write};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ViewerInput {
    Next,
    Previous,
    Quit,
}

pub fn render<R: CategoryResolver + ?Sized>(
    result: &BattleResult,
    cursor: &ReplayCursor<'_>,
    categories: &R,
) {
    clear_screen();
    println!(
        "{}  vs  {}   (round {}/{})",
        result.team1.name,
        result.team2.name,
        cursor.index() + 1,
        result.rounds.len()
    );
    println!();
    print_roster(result.team(Side::Team1), cursor, Side::Team1);
    print_roster(result.team(Side::Team2), cursor, Side::Team2);
    println!();

    let Some(round) = cursor.current_round() else {
        println!("No rounds were fought.");
        return;
    };
    print_round(round, categories);
    if cursor.is_completed() {
        println!();
        print_result(result);
    }
}

fn print_roster(team: &Team, cursor: &ReplayCursor<'_>, side: Side) {
    let defeated = cursor.defeated_positions(side);
    let active = cursor.active_position(side);
    let marks: Vec<String> = team
        .creatures
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            if defeated.contains(&idx) {
                format!("x{}", c.name)
            } else if idx == active {
                format!("*{}", c.name)
            } else {
                c.name.clone()
            }
        })
        .collect();
    println!("{:<20} {}", team.name, marks.join("  "));
}

fn print_round<R: CategoryResolver + ?Sized>(round: &BattleRound, categories: &R) {
    println!("=== Round {} ===", round.round_number);
    for (creature, damage, life_after, factor) in [
        (&round.p1, round.damage_to_p1, round.life_after_p1, round.factor_p2),
        (&round.p2, round.damage_to_p2, round.life_after_p2, round.factor_p1),
    ] {
        let pct = life_percentage(life_after, creature.original_life);
        println!(
            "{:<12} {:<10} {} {:>5.1}%  -{damage} (x{factor})",
            creature.creature.name,
            category_display_name(categories, &creature.category_id),
            life_bar(pct),
            pct,
        );
    }
    let summary = match round.outcome {
        RoundOutcome::Side1 => format!("{} wins the round", round.p1.creature.name),
        RoundOutcome::Side2 => format!("{} wins the round", round.p2.creature.name),
        RoundOutcome::DoubleKnockout => "Both creatures are knocked out".to_string(),
        RoundOutcome::NoKnockout => "Both creatures are still standing".to_string(),
    };
    println!("{summary}");
}

fn life_bar(percentage: f64) -> String {
    let width = 20usize;
    let filled = ((percentage / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let fill = match LifeBand::from_percentage(percentage) {
        LifeBand::Healthy => '=',
        LifeBand::Wounded => '-',
        LifeBand::Critical => '!',
    };
    let mut bar = String::new();
    bar.push('[');
    for _ in 0..filled {
        bar.push(fill);
    }
    for _ in filled..width {
        bar.push('.');
    }
    bar.push(']');
    bar
}

pub fn print_result(result: &BattleResult) {
    match result.termination {
        Termination::Exhausted => println!("{} wins the battle!", result.winner_team().name),
        Termination::RoundLimit => println!(
            "Round limit reached, {} is declared the winner.",
            result.winner_team().name
        ),
    }
}

pub fn prompt(can_go_previous: bool, can_go_next: bool) -> Result<ViewerInput> {
    loop {
        let mut options = Vec::new();
        if can_go_previous {
            options.push("p: previous");
        }
        if can_go_next {
            options.push("n: next");
        }
        options.push("q: quit");
        print!("{} > ", options.join("  "));
        let input = read_line()?;
        match interpret(&input, can_go_previous, can_go_next) {
            Some(choice) => return Ok(choice),
            None => println!("Invalid input, try again."),
        }
    }
}

/// Maps one raw line to a choice. An empty read means stdin is closed.
fn interpret(input: &str, can_go_previous: bool, can_go_next: bool) -> Option<ViewerInput> {
    if input.is_empty() {
        return Some(ViewerInput::Quit);
    }
    match input.trim() {
        "n" | "" if can_go_next => Some(ViewerInput::Next),
        "p" if can_go_previous => Some(ViewerInput::Previous),
        "q" => Some(ViewerInput::Quit),
        _ => None,
    }
}

pub fn prompt_team(label: &str, teams: &[Team]) -> Result<usize> {
    for (idx, team) in teams.iter().enumerate() {
        println!(
            "{:>2}: {} (power {}, {} creatures)",
            idx + 1,
            team.name,
            team.power(),
            team.creatures.len()
        );
    }
    loop {
        print!("Select {label} by number: ");
        let input = read_line()?;
        if input.is_empty() {
            anyhow::bail!("no team selected");
        }
        if let Ok(choice) = input.trim().parse::<usize>() {
            if (1..=teams.len()).contains(&choice) {
                return Ok(choice - 1);
            }
        }
        println!("Invalid input, try again.");
    }
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
    let _ = io::stdout().flush();
}

fn read_line() -> Result<String> {
    let mut buf = String::new();
    io::stdout().flush()?;
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

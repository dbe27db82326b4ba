use crate::battle::{simulate_battle_with_config, BattleConfig, Side};
use crate::category::CategoryResolver;
use crate::effectiveness::EffectivenessTable;
use crate::model::Team;
use rayon::prelude::*;
use std::fmt::Write as _;

/// Win matrix over every ordered pair of teams.
///
/// `matrix[i][j]` is 1.0 when team `i` beats team `j` as team 1, 0.0 when it
/// loses, and NaN on the diagonal. Each cell is an independent simulation,
/// so cells run in parallel with their own effectiveness cache.
pub fn compute_matrix<T, R>(
    teams: &[Team],
    table: &T,
    categories: &R,
    config: &BattleConfig,
) -> Vec<Vec<f64>>
where
    T: EffectivenessTable + Sync + ?Sized,
    R: CategoryResolver + Sync + ?Sized,
{
    let tasks: Vec<(usize, usize)> = (0..teams.len())
        .flat_map(|a| (0..teams.len()).filter(move |b| *b != a).map(move |b| (a, b)))
        .collect();
    let cell_results: Vec<CellResult> = tasks
        .par_iter()
        .map(|(a_idx, b_idx)| {
            let result = simulate_battle_with_config(
                &teams[*a_idx],
                &teams[*b_idx],
                table,
                categories,
                config,
            );
            CellResult {
                a_idx: *a_idx,
                b_idx: *b_idx,
                score: if result.winner == Side::Team1 { 1.0 } else { 0.0 },
            }
        })
        .collect();

    let mut matrix = vec![vec![f64::NAN; teams.len()]; teams.len()];
    for cell in cell_results {
        matrix[cell.a_idx][cell.b_idx] = cell.score;
    }
    matrix
}

/// Number of wins for each row team across its row.
pub fn row_wins(matrix: &[Vec<f64>]) -> Vec<usize> {
    matrix
        .iter()
        .map(|row| row.iter().filter(|v| **v >= 1.0).count())
        .collect()
}

pub fn render_csv(teams: &[Team], matrix: &[Vec<f64>]) -> String {
    let mut out = String::from("team");
    for team in teams {
        out.push(',');
        out.push_str(&team.name);
    }
    for (row_idx, row) in matrix.iter().enumerate() {
        out.push('\n');
        out.push_str(teams.get(row_idx).map(|t| t.name.as_str()).unwrap_or(""));
        for value in row {
            out.push(',');
            if value.is_nan() {
                out.push('-');
            } else {
                let _ = write!(out, "{value:.0}");
            }
        }
    }
    out
}

pub fn write_csv(teams: &[Team], matrix: &[Vec<f64>], path: &std::path::Path) -> anyhow::Result<()> {
    std::fs::write(path, render_csv(teams, matrix))?;
    Ok(())
}

struct CellResult {
    a_idx: usize,
    b_idx: usize,
    score: f64,
}

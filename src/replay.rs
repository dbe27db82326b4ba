//! Battle state derived from the round list.
//!
//! Nothing here looks at engine internals: given a [`BattleResult`] and a
//! round index, the active and defeated positions of each side are rebuilt
//! by walking the recorded rounds. That keeps animation and stepping UIs
//! independent of the resolver.

use crate::battle::{BattleResult, BattleRound, Side};

/// Positions in a side's roster knocked out in rounds `0..=round_index`.
pub fn defeated_positions(result: &BattleResult, side: Side, round_index: usize) -> Vec<usize> {
    let roster_len = result.team(side).creatures.len();
    let mut defeated: Vec<usize> = Vec::new();
    let mut active = 0usize;

    for round in result.rounds.iter().take(round_index.saturating_add(1)) {
        while active < roster_len && defeated.contains(&active) {
            active += 1;
        }
        if life_after(round, side) <= 0.0 && active < roster_len {
            defeated.push(active);
            active += 1;
        }
    }
    defeated
}

/// First roster position still standing after `round_index`, `0` when none is.
pub fn active_position(result: &BattleResult, side: Side, round_index: usize) -> usize {
    let defeated = defeated_positions(result, side, round_index);
    let roster_len = result.team(side).creatures.len();
    (0..roster_len)
        .find(|idx| !defeated.contains(idx))
        .unwrap_or(0)
}

fn life_after(round: &BattleRound, side: Side) -> f64 {
    match side {
        Side::Team1 => round.life_after_p1,
        Side::Team2 => round.life_after_p2,
    }
}

/// Remaining life as a percentage of `max_life`, never below zero.
pub fn life_percentage(current_life: f64, max_life: u32) -> f64 {
    if max_life == 0 {
        return 0.0;
    }
    (current_life / f64::from(max_life) * 100.0).max(0.0)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LifeBand {
    Healthy,
    Wounded,
    Critical,
}

impl LifeBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 60.0 {
            LifeBand::Healthy
        } else if percentage > 30.0 {
            LifeBand::Wounded
        } else {
            LifeBand::Critical
        }
    }
}

/// Steps back and forth through the rounds of a finished battle.
#[derive(Clone, Debug)]
pub struct ReplayCursor<'a> {
    result: &'a BattleResult,
    index: usize,
}

impl<'a> ReplayCursor<'a> {
    pub fn new(result: &'a BattleResult) -> Self {
        ReplayCursor { result, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_round(&self) -> Option<&'a BattleRound> {
        self.result.rounds.get(self.index)
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.result.rounds.len()
    }

    pub fn can_go_previous(&self) -> bool {
        self.index > 0
    }

    pub fn next(&mut self) -> Option<&'a BattleRound> {
        if self.can_go_next() {
            self.index += 1;
        }
        self.current_round()
    }

    pub fn previous(&mut self) -> Option<&'a BattleRound> {
        if self.can_go_previous() {
            self.index -= 1;
        }
        self.current_round()
    }

    /// True once the last round is on screen.
    pub fn is_completed(&self) -> bool {
        !self.result.rounds.is_empty() && self.index + 1 == self.result.rounds.len()
    }

    pub fn active_position(&self, side: Side) -> usize {
        active_position(self.result, side, self.index)
    }

    pub fn defeated_positions(&self, side: Side) -> Vec<usize> {
        if self.result.rounds.is_empty() {
            return Vec::new();
        }
        defeated_positions(self.result, side, self.index)
    }
}

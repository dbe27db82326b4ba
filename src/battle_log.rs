use crate::battle::{BattleCreature, BattleResult, Side, Termination};
use crate::category::{category_display_name, CategoryResolver};
use serde_json::json;

/// Line-oriented transcript of a finished battle.
#[derive(Clone, Debug, Default)]
pub struct BattleLog {
    log: Vec<String>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self { log: Vec::new() }
    }

    pub fn from_result<R: CategoryResolver + ?Sized>(result: &BattleResult, categories: &R) -> Self {
        let mut log = Self::new();
        log.log_teams(result);
        for round in &result.rounds {
            log.log_round(round.round_number);
            log.log_matchup(&round.p1, &round.p2, categories);
            log.log_hit(
                side_ident(Side::Team2, &round.p2),
                side_ident(Side::Team1, &round.p1),
                round.damage_to_p1,
                round.factor_p2,
                round.life_after_p1,
                round.p1.original_life,
            );
            log.log_hit(
                side_ident(Side::Team1, &round.p1),
                side_ident(Side::Team2, &round.p2),
                round.damage_to_p2,
                round.factor_p1,
                round.life_after_p2,
                round.p2.original_life,
            );
            if round.life_after_p1 <= 0.0 {
                log.log_faint(&side_ident(Side::Team1, &round.p1));
            }
            if round.life_after_p2 <= 0.0 {
                log.log_faint(&side_ident(Side::Team2, &round.p2));
            }
        }
        if result.termination == Termination::RoundLimit {
            log.log.push(format!("|limit|{}", result.rounds.len()));
        }
        log.log_win(&result.winner_team().name);
        log
    }

    fn log_teams(&mut self, result: &BattleResult) {
        for (side, team) in [(Side::Team1, &result.team1), (Side::Team2, &result.team2)] {
            self.log.push(format!(
                "|team|{}|{}|{}",
                side_prefix(side),
                team.name,
                team.creatures.len()
            ));
        }
    }

    pub fn log_round(&mut self, round: u32) {
        self.log.push(format!("|round|{round}"));
    }

    fn log_matchup<R: CategoryResolver + ?Sized>(
        &mut self,
        p1: &BattleCreature,
        p2: &BattleCreature,
        categories: &R,
    ) {
        self.log.push(format!(
            "|matchup|{}|{}|{}|{}",
            side_ident(Side::Team1, p1),
            category_display_name(categories, &p1.category_id),
            side_ident(Side::Team2, p2),
            category_display_name(categories, &p2.category_id),
        ));
    }

    pub fn log_hit(
        &mut self,
        source: String,
        target: String,
        damage: f64,
        factor: f64,
        life_after: f64,
        max_life: u32,
    ) {
        self.log.push(format!(
            "|hit|{source}|{target}|{damage}|x{factor}|{}/{max_life}",
            life_after.max(0.0)
        ));
    }

    pub fn log_faint(&mut self, target: &str) {
        self.log.push(format!("|faint|{target}"));
    }

    pub fn log_win(&mut self, winner: &str) {
        self.log.push(format!("|win|{winner}"));
    }

    pub fn lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({ "log": self.log })
    }
}

fn side_prefix(side: Side) -> &'static str {
    match side {
        Side::Team1 => "p1",
        Side::Team2 => "p2",
    }
}

pub fn side_ident(side: Side, creature: &BattleCreature) -> String {
    format!("{}: {}", side_prefix(side), creature.creature.name)
}

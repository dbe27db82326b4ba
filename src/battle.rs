use crate::category::{resolve_category_id, CategoryResolver};
use crate::effectiveness::{EffectivenessResolver, EffectivenessTable};
use crate::model::{CategoryId, Creature, Team};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Hard cap on rounds for a single simulation.
pub const DEFAULT_MAX_ROUNDS: u32 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

/// Result of a single exchange between the two active creatures.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundOutcome {
    /// Only the team 2 creature dropped to zero.
    Side1,
    /// Only the team 1 creature dropped to zero.
    Side2,
    DoubleKnockout,
    NoKnockout,
}

impl RoundOutcome {
    fn from_life_after(life_after_p1: f64, life_after_p2: f64) -> Self {
        match (life_after_p1 <= 0.0, life_after_p2 <= 0.0) {
            (true, true) => RoundOutcome::DoubleKnockout,
            (true, false) => RoundOutcome::Side2,
            (false, true) => RoundOutcome::Side1,
            (false, false) => RoundOutcome::NoKnockout,
        }
    }

    /// True for the two outcomes without a single round winner.
    pub fn is_draw(self) -> bool {
        matches!(self, RoundOutcome::DoubleKnockout | RoundOutcome::NoKnockout)
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            RoundOutcome::Side1 => Some(Side::Team1),
            RoundOutcome::Side2 => Some(Side::Team2),
            RoundOutcome::DoubleKnockout | RoundOutcome::NoKnockout => None,
        }
    }
}

/// How the round loop ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// At least one team ran out of creatures.
    Exhausted,
    /// The round cap was hit with both teams still standing.
    RoundLimit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleCreature {
    pub creature: Creature,
    pub current_life: f64,
    pub original_life: u32,
    pub is_defeated: bool,
    pub category_id: CategoryId,
}

impl BattleCreature {
    pub fn new(creature: &Creature, category_id: CategoryId) -> Self {
        BattleCreature {
            current_life: f64::from(creature.life),
            original_life: creature.life,
            is_defeated: false,
            category_id,
            creature: creature.clone(),
        }
    }

    pub fn power(&self) -> f64 {
        f64::from(self.creature.power)
    }

    fn apply_life_after(&mut self, raw: f64) -> bool {
        self.current_life = raw.max(0.0);
        if self.current_life <= 0.0 {
            self.is_defeated = true;
        }
        self.is_defeated
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRound {
    pub round_number: u32,
    /// Snapshots taken before this round's damage.
    pub p1: BattleCreature,
    pub p2: BattleCreature,
    pub damage_to_p1: f64,
    pub damage_to_p2: f64,
    /// Raw values, not clamped.
    pub life_after_p1: f64,
    pub life_after_p2: f64,
    /// Multiplier on the damage p1 deals to p2.
    pub factor_p1: f64,
    /// Multiplier on the damage p2 deals to p1.
    pub factor_p2: f64,
    pub outcome: RoundOutcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleResult {
    pub team1: Team,
    pub team2: Team,
    pub rounds: Vec<BattleRound>,
    pub winner: Side,
    pub termination: Termination,
}

impl BattleResult {
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn winner_team(&self) -> &Team {
        self.team(self.winner)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl BattleConfig {
    fn round_cap(&self) -> u32 {
        self.max_rounds.max(1)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Phase {
    Ready,
    Running,
    Concluded,
    Aborted,
}

struct Battle<'a, T: EffectivenessTable + ?Sized> {
    team_1: Vec<BattleCreature>,
    team_2: Vec<BattleCreature>,
    active_1: usize,
    active_2: usize,
    rounds: Vec<BattleRound>,
    phase: Phase,
    effectiveness: EffectivenessResolver<'a, T>,
    round_cap: u32,
}

impl<'a, T: EffectivenessTable + ?Sized> Battle<'a, T> {
    fn new<R: CategoryResolver + ?Sized>(
        team1: &Team,
        team2: &Team,
        table: &'a T,
        categories: &R,
        config: &BattleConfig,
    ) -> Self {
        Battle {
            team_1: build_roster(team1, categories),
            team_2: build_roster(team2, categories),
            active_1: 0,
            active_2: 0,
            rounds: Vec::new(),
            phase: Phase::Ready,
            effectiveness: EffectivenessResolver::new(table),
            round_cap: config.round_cap(),
        }
    }

    fn team(&self, side: Side) -> &Vec<BattleCreature> {
        match side {
            Side::Team1 => &self.team_1,
            Side::Team2 => &self.team_2,
        }
    }

    fn active_index(&self, side: Side) -> usize {
        match side {
            Side::Team1 => self.active_1,
            Side::Team2 => self.active_2,
        }
    }

    fn set_active_index(&mut self, side: Side, idx: usize) {
        match side {
            Side::Team1 => self.active_1 = idx,
            Side::Team2 => self.active_2 = idx,
        }
    }

    /// Moves the side's pointer past defeated creatures. Returns false when
    /// the roster is used up.
    fn send_next(&mut self, side: Side) -> bool {
        let team = self.team(side);
        let mut idx = self.active_index(side);
        while idx < team.len() && team[idx].is_defeated {
            idx += 1;
        }
        let available = idx < team.len();
        self.set_active_index(side, idx);
        available
    }

    fn survivor_count(&self, side: Side) -> usize {
        self.team(side).iter().filter(|c| !c.is_defeated).count()
    }

    fn surviving_life(&self, side: Side) -> f64 {
        self.team(side)
            .iter()
            .filter(|c| !c.is_defeated)
            .map(|c| c.current_life)
            .sum()
    }

    fn run(&mut self) {
        self.phase = Phase::Running;
        while self.phase == Phase::Running {
            let ready_1 = self.send_next(Side::Team1);
            let ready_2 = self.send_next(Side::Team2);
            if !ready_1 || !ready_2 {
                self.phase = Phase::Concluded;
                break;
            }
            self.run_round();
            if self.rounds.len() as u32 >= self.round_cap {
                self.phase = if self.survivor_count(Side::Team1) > 0
                    && self.survivor_count(Side::Team2) > 0
                {
                    warn!(
                        rounds = self.rounds.len(),
                        "battle hit the round limit, forcing a verdict"
                    );
                    Phase::Aborted
                } else {
                    Phase::Concluded
                };
            }
        }
    }

    fn run_round(&mut self) {
        let (i1, i2) = (self.active_1, self.active_2);
        let p1 = self.team_1[i1].clone();
        let p2 = self.team_2[i2].clone();

        let factor_p1 = self.effectiveness.factor(&p1.category_id, &p2.category_id);
        let factor_p2 = self.effectiveness.factor(&p2.category_id, &p1.category_id);

        let damage_to_p1 = p2.power() * factor_p2;
        let damage_to_p2 = p1.power() * factor_p1;
        let life_after_p1 = p1.current_life - damage_to_p1;
        let life_after_p2 = p2.current_life - damage_to_p2;
        let outcome = RoundOutcome::from_life_after(life_after_p1, life_after_p2);
        let round_number = self.rounds.len() as u32 + 1;

        debug!(
            round = round_number,
            p1 = %p1.creature.name,
            p2 = %p2.creature.name,
            damage_to_p1,
            damage_to_p2,
            ?outcome,
            "round resolved"
        );

        self.rounds.push(BattleRound {
            round_number,
            p1,
            p2,
            damage_to_p1,
            damage_to_p2,
            life_after_p1,
            life_after_p2,
            factor_p1,
            factor_p2,
            outcome,
        });

        if self.team_1[i1].apply_life_after(life_after_p1) {
            self.active_1 += 1;
        }
        if self.team_2[i2].apply_life_after(life_after_p2) {
            self.active_2 += 1;
        }
    }

    fn verdict(&self) -> Side {
        let alive_1 = self.survivor_count(Side::Team1);
        let alive_2 = self.survivor_count(Side::Team2);
        match (alive_1, alive_2) {
            (a, 0) if a > 0 => Side::Team1,
            (0, b) if b > 0 => Side::Team2,
            (a, b) if a > b => Side::Team1,
            (a, b) if b > a => Side::Team2,
            _ => {
                if self.surviving_life(Side::Team1) >= self.surviving_life(Side::Team2) {
                    Side::Team1
                } else {
                    Side::Team2
                }
            }
        }
    }

    fn termination(&self) -> Termination {
        match self.phase {
            Phase::Aborted => Termination::RoundLimit,
            Phase::Ready | Phase::Running | Phase::Concluded => Termination::Exhausted,
        }
    }
}

fn build_roster<R: CategoryResolver + ?Sized>(team: &Team, categories: &R) -> Vec<BattleCreature> {
    team.creatures
        .iter()
        .map(|c| BattleCreature::new(c, resolve_category_id(categories, &c.category)))
        .collect()
}

/// Runs a full battle between two teams with the default round cap.
///
/// Both rosters are read in order; the first creature of each side fights
/// until one of them drops, then the next in line takes its place.
pub fn simulate_battle<T, R>(team1: &Team, team2: &Team, table: &T, categories: &R) -> BattleResult
where
    T: EffectivenessTable + ?Sized,
    R: CategoryResolver + ?Sized,
{
    simulate_battle_with_config(team1, team2, table, categories, &BattleConfig::default())
}

pub fn simulate_battle_with_config<T, R>(
    team1: &Team,
    team2: &Team,
    table: &T,
    categories: &R,
    config: &BattleConfig,
) -> BattleResult
where
    T: EffectivenessTable + ?Sized,
    R: CategoryResolver + ?Sized,
{
    let mut battle = Battle::new(team1, team2, table, categories, config);
    battle.run();
    let winner = battle.verdict();
    let termination = battle.termination();
    info!(
        team1 = %team1.id,
        team2 = %team2.id,
        rounds = battle.rounds.len(),
        ?winner,
        ?termination,
        "battle concluded"
    );
    BattleResult {
        team1: team1.clone(),
        team2: team2.clone(),
        rounds: battle.rounds,
        winner,
        termination,
    }
}

/// Owns the lookup collaborators so callers can run many battles against
/// the same tables.
pub struct BattleSimulator<T, R> {
    table: T,
    categories: R,
    config: BattleConfig,
}

impl<T: EffectivenessTable, R: CategoryResolver> BattleSimulator<T, R> {
    pub fn new(table: T, categories: R) -> Self {
        BattleSimulator {
            table,
            categories,
            config: BattleConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn categories(&self) -> &R {
        &self.categories
    }

    pub fn simulate(&self, team1: &Team, team2: &Team) -> BattleResult {
        simulate_battle_with_config(team1, team2, &self.table, &self.categories, &self.config)
    }
}

use creature_battle::battle::{
    simulate_battle, simulate_battle_with_config, BattleConfig, BattleSimulator, RoundOutcome,
    Side, Termination,
};
use creature_battle::category::default_directory;
use creature_battle::effectiveness::{EffectivenessTable, MapEffectivenessTable, StandardChart};
use creature_battle::error::LookupError;
use creature_battle::model::{CategoryId, Creature, Team};
use std::cell::RefCell;
use std::collections::HashMap;

fn make_creature(id: u32, name: &str, category: &str, power: u32, life: u32) -> Creature {
    Creature {
        id,
        name: name.to_string(),
        image: format!("{id}.png"),
        power,
        life,
        category: category.to_string(),
    }
}

fn make_team(id: &str, creatures: Vec<Creature>) -> Team {
    Team::new(id, format!("Team {id}"), creatures)
}

fn neutral_table() -> MapEffectivenessTable {
    MapEffectivenessTable::new()
}

fn zero_table(a: &str, b: &str) -> MapEffectivenessTable {
    let mut table = MapEffectivenessTable::new();
    table.insert(a.into(), b.into(), 0.0);
    table.insert(b.into(), a.into(), 0.0);
    table.insert(a.into(), a.into(), 0.0);
    table.insert(b.into(), b.into(), 0.0);
    table
}

struct FailingTable;

impl EffectivenessTable for FailingTable {
    fn lookup(&self, _: &CategoryId, _: &CategoryId) -> Result<Option<f64>, LookupError> {
        Err(LookupError::Unavailable("database offline".into()))
    }
}

#[derive(Default)]
struct RecordingTable {
    inner: MapEffectivenessTable,
    calls: RefCell<HashMap<(CategoryId, CategoryId), usize>>,
}

impl EffectivenessTable for RecordingTable {
    fn lookup(
        &self,
        attacking: &CategoryId,
        defending: &CategoryId,
    ) -> Result<Option<f64>, LookupError> {
        *self
            .calls
            .borrow_mut()
            .entry((attacking.clone(), defending.clone()))
            .or_insert(0) += 1;
        self.inner.lookup(attacking, defending)
    }
}

#[test]
fn stronger_single_creature_wins_in_one_round() {
    let a = make_creature(1, "Attacker", "Fire", 50, 100);
    let b = make_creature(2, "Target", "Water", 30, 40);
    let team1 = make_team("1", vec![a]);
    let team2 = make_team("2", vec![b]);

    let result = simulate_battle(&team1, &team2, &neutral_table(), &default_directory());

    assert_eq!(result.rounds.len(), 1);
    let round = &result.rounds[0];
    assert_eq!(round.round_number, 1);
    assert_eq!(round.damage_to_p2, 50.0);
    assert_eq!(round.damage_to_p1, 30.0);
    assert_eq!(round.life_after_p2, -10.0);
    assert_eq!(round.life_after_p1, 70.0);
    assert_eq!(round.factor_p1, 1.0);
    assert_eq!(round.factor_p2, 1.0);
    assert_eq!(round.outcome, RoundOutcome::Side1);
    assert_eq!(round.p1.current_life, 100.0);
    assert_eq!(round.p2.current_life, 40.0);
    assert_eq!(result.winner, Side::Team1);
    assert_eq!(result.winner_team().id, "1");
    assert_eq!(result.termination, Termination::Exhausted);
}

#[test]
fn simultaneous_knockout_goes_to_team1() {
    let a = make_creature(1, "Alpha", "Fire", 50, 40);
    let b = make_creature(2, "Beta", "Fire", 60, 30);
    let team1 = make_team("1", vec![a]);
    let team2 = make_team("2", vec![b]);

    let result = simulate_battle(&team1, &team2, &neutral_table(), &default_directory());

    assert_eq!(result.rounds.len(), 1);
    let round = &result.rounds[0];
    assert_eq!(round.outcome, RoundOutcome::DoubleKnockout);
    assert!(round.outcome.is_draw());
    assert_eq!(round.outcome.winner(), None);
    assert_eq!(result.winner, Side::Team1);
    assert_eq!(result.termination, Termination::Exhausted);
}

#[test]
fn no_knockout_rounds_are_distinct_from_double_knockouts() {
    let a = make_creature(1, "Alpha", "Fire", 10, 100);
    let b = make_creature(2, "Beta", "Fire", 10, 100);
    let result = simulate_battle(
        &make_team("1", vec![a]),
        &make_team("2", vec![b]),
        &neutral_table(),
        &default_directory(),
    );
    assert_eq!(result.rounds.len(), 10);
    assert!(result.rounds[..9]
        .iter()
        .all(|r| r.outcome == RoundOutcome::NoKnockout));
    assert_eq!(result.rounds[9].outcome, RoundOutcome::DoubleKnockout);
}

#[test]
fn one_creature_sweeps_a_full_roster_in_order() {
    let sweeper = make_creature(1, "Sweeper", "Fire", 100, 150);
    let team1 = make_team("1", vec![sweeper]);
    let team2 = make_team(
        "2",
        vec![
            make_creature(2, "First", "Water", 10, 50),
            make_creature(3, "Second", "Water", 10, 50),
            make_creature(4, "Third", "Water", 10, 50),
        ],
    );

    let result = simulate_battle(&team1, &team2, &neutral_table(), &default_directory());

    let opponents: Vec<&str> = result
        .rounds
        .iter()
        .map(|r| r.p2.creature.name.as_str())
        .collect();
    assert_eq!(opponents, vec!["First", "Second", "Third"]);
    let sweeper_life: Vec<f64> = result.rounds.iter().map(|r| r.p1.current_life).collect();
    assert_eq!(sweeper_life, vec![150.0, 140.0, 130.0]);
    assert!(result.rounds.iter().all(|r| r.outcome == RoundOutcome::Side1));
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn pointers_advance_once_per_defeat() {
    let team1 = make_team(
        "1",
        vec![
            make_creature(1, "A1", "Fire", 30, 100),
            make_creature(2, "A2", "Fire", 100, 100),
        ],
    );
    let team2 = make_team(
        "2",
        vec![
            make_creature(3, "B1", "Fire", 60, 60),
            make_creature(4, "B2", "Fire", 60, 60),
        ],
    );

    let result = simulate_battle(&team1, &team2, &neutral_table(), &default_directory());

    let pairs: Vec<(&str, &str)> = result
        .rounds
        .iter()
        .map(|r| (r.p1.creature.name.as_str(), r.p2.creature.name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("A1", "B1"), ("A1", "B1"), ("A2", "B2")]);
    let outcomes: Vec<RoundOutcome> = result.rounds.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            RoundOutcome::NoKnockout,
            RoundOutcome::DoubleKnockout,
            RoundOutcome::Side1
        ]
    );
    assert_eq!(result.rounds[1].p1.current_life, 40.0);
    assert_eq!(result.rounds[1].p2.current_life, 30.0);
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn three_on_three_mutual_one_shots_trade_down_the_rosters() {
    let roster = |prefix: &str, base: u32| {
        (0..3)
            .map(|i| make_creature(base + i, &format!("{prefix}{i}"), "Fire", 100, 50))
            .collect::<Vec<_>>()
    };
    let result = simulate_battle(
        &make_team("1", roster("a", 1)),
        &make_team("2", roster("b", 10)),
        &neutral_table(),
        &default_directory(),
    );
    assert_eq!(result.rounds.len(), 3);
    for (idx, round) in result.rounds.iter().enumerate() {
        assert_eq!(round.p1.creature.name, format!("a{idx}"));
        assert_eq!(round.p2.creature.name, format!("b{idx}"));
        assert_eq!(round.outcome, RoundOutcome::DoubleKnockout);
    }
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn factors_follow_attacker_to_defender_direction() {
    let mut table = MapEffectivenessTable::new();
    table.insert("1".into(), "3".into(), 2.0);
    table.insert("3".into(), "1".into(), 0.5);
    let fire = make_creature(1, "Flame", "Fire", 40, 100);
    let grass = make_creature(2, "Leaf", "Grass", 40, 100);

    let result = simulate_battle(
        &make_team("1", vec![fire]),
        &make_team("2", vec![grass]),
        &table,
        &default_directory(),
    );

    let first = &result.rounds[0];
    assert_eq!(first.p1.category_id, CategoryId::from("1"));
    assert_eq!(first.p2.category_id, CategoryId::from("3"));
    assert_eq!(first.factor_p1, 2.0);
    assert_eq!(first.factor_p2, 0.5);
    assert_eq!(first.damage_to_p2, 80.0);
    assert_eq!(first.damage_to_p1, 20.0);
    assert_eq!(result.rounds.len(), 2);
    assert_eq!(result.rounds[1].outcome, RoundOutcome::Side1);
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn missing_effectiveness_entry_is_neutral() {
    let mut inner = MapEffectivenessTable::new();
    inner.insert("1".into(), "3".into(), 2.0);
    let table = RecordingTable {
        inner,
        ..Default::default()
    };
    let team1 = make_team(
        "1",
        vec![
            make_creature(1, "Splash", "Water", 20, 45),
            make_creature(2, "Wave", "Water", 20, 45),
        ],
    );
    let team2 = make_team("2", vec![make_creature(3, "Spark", "Electric", 15, 100)]);

    let result = simulate_battle(&team1, &team2, &table, &default_directory());

    assert!(!result.rounds.is_empty());
    assert!(result
        .rounds
        .iter()
        .all(|r| r.factor_p1 == 1.0 && r.factor_p2 == 1.0));
    let calls = table.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert!(calls.values().all(|count| *count == 1));
    assert_eq!(result.rounds.len(), 5);
    assert_eq!(result.rounds[4].outcome, RoundOutcome::Side1);
    assert_eq!(result.winner, Side::Team1);
    assert_eq!(result.termination, Termination::Exhausted);
}

#[test]
fn failing_table_still_completes_the_battle() {
    let team1 = make_team("1", vec![make_creature(1, "A", "Fire", 50, 120)]);
    let team2 = make_team("2", vec![make_creature(2, "B", "Water", 50, 60)]);
    let result = simulate_battle(&team1, &team2, &FailingTable, &default_directory());
    assert_eq!(result.rounds.len(), 2);
    assert!(result.rounds.iter().all(|r| r.factor_p1 == 1.0));
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn stalemate_stops_at_the_round_limit_and_compares_life() {
    let team1 = make_team("1", vec![make_creature(1, "Wall", "Normal", 50, 50)]);
    let team2 = make_team("2", vec![make_creature(2, "Spirit", "Ghost", 50, 80)]);
    let result = simulate_battle(&team1, &team2, &StandardChart, &default_directory());

    assert_eq!(result.rounds.len(), 100);
    assert_eq!(result.rounds.last().map(|r| r.round_number), Some(100));
    assert!(result.rounds.iter().all(|r| r.damage_to_p1 == 0.0 && r.damage_to_p2 == 0.0));
    assert_eq!(result.termination, Termination::RoundLimit);
    assert_eq!(result.winner, Side::Team2);
}

#[test]
fn round_limit_prefers_more_survivors() {
    let team1 = make_team(
        "1",
        vec![
            make_creature(1, "A", "Fire", 10, 10),
            make_creature(2, "B", "Fire", 10, 10),
        ],
    );
    let team2 = make_team("2", vec![make_creature(3, "C", "Water", 10, 500)]);
    let result = simulate_battle(&team1, &team2, &zero_table("1", "2"), &default_directory());
    assert_eq!(result.termination, Termination::RoundLimit);
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn equal_life_at_the_limit_goes_to_team1() {
    let team1 = make_team("1", vec![make_creature(1, "A", "Fire", 10, 70)]);
    let team2 = make_team("2", vec![make_creature(2, "B", "Water", 10, 70)]);
    let config = BattleConfig { max_rounds: 5 };
    let result = simulate_battle_with_config(
        &team1,
        &team2,
        &zero_table("1", "2"),
        &default_directory(),
        &config,
    );
    assert_eq!(result.rounds.len(), 5);
    assert_eq!(result.termination, Termination::RoundLimit);
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn knockout_on_the_last_allowed_round_is_not_an_abort() {
    let team1 = make_team("1", vec![make_creature(1, "A", "Fire", 50, 100)]);
    let team2 = make_team("2", vec![make_creature(2, "B", "Water", 30, 40)]);
    let config = BattleConfig { max_rounds: 1 };
    let result = simulate_battle_with_config(
        &team1,
        &team2,
        &neutral_table(),
        &default_directory(),
        &config,
    );
    assert_eq!(result.rounds.len(), 1);
    assert_eq!(result.termination, Termination::Exhausted);
}

#[test]
fn zero_round_cap_still_runs_one_round() {
    let team1 = make_team("1", vec![make_creature(1, "A", "Fire", 10, 100)]);
    let team2 = make_team("2", vec![make_creature(2, "B", "Water", 10, 100)]);
    let result = simulate_battle_with_config(
        &team1,
        &team2,
        &neutral_table(),
        &default_directory(),
        &BattleConfig { max_rounds: 0 },
    );
    assert_eq!(result.rounds.len(), 1);
    assert_eq!(result.termination, Termination::RoundLimit);
}

#[test]
fn empty_rosters_produce_no_rounds() {
    let full = make_team("1", vec![make_creature(1, "A", "Fire", 10, 10)]);
    let empty = make_team("2", vec![]);
    let dir = default_directory();
    let table = neutral_table();

    let result = simulate_battle(&empty, &full, &table, &dir);
    assert!(result.rounds.is_empty());
    assert_eq!(result.winner, Side::Team2);

    let result = simulate_battle(&full, &empty, &table, &dir);
    assert_eq!(result.winner, Side::Team1);

    let other_empty = make_team("3", vec![]);
    let result = simulate_battle(&empty, &other_empty, &table, &dir);
    assert!(result.rounds.is_empty());
    assert_eq!(result.winner, Side::Team1);
}

#[test]
fn input_teams_are_returned_unchanged() {
    let team1 = make_team("1", vec![make_creature(1, "A", "Fire", 60, 50)]);
    let team2 = make_team("2", vec![make_creature(2, "B", "Grass", 20, 50)]);
    let simulator = BattleSimulator::new(StandardChart, default_directory());
    let result = simulator.simulate(&team1, &team2);
    assert_eq!(result.team1, team1);
    assert_eq!(result.team2, team2);
    assert_eq!(result.team1.creatures[0].category, "Fire");
    assert_eq!(simulator.simulate(&team1, &team2), result);
}

#[test]
fn result_serializes_with_camel_case_fields() {
    let team1 = make_team("1", vec![make_creature(1, "A", "Fire", 60, 50)]);
    let team2 = make_team("2", vec![make_creature(2, "B", "Grass", 20, 50)]);
    let result = simulate_battle(&team1, &team2, &StandardChart, &default_directory());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["winner"], "team1");
    assert_eq!(json["termination"], "exhausted");
    assert_eq!(json["rounds"][0]["roundNumber"], 1);
    assert_eq!(json["rounds"][0]["outcome"], "side1");
    assert_eq!(json["rounds"][0]["p1"]["categoryId"], "1");
}

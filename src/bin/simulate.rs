use clap::Parser;
use grid_chase::autopilot::choose_direction;
use grid_chase::engine::GridChaseEngine;
use grid_chase::render::{render_board, status_line};
use grid_chase::rng::Rng;
use grid_chase::types::{Cell, GameConfig, GameEvent, Snapshot, Variant};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_GAMES: usize = 5;
const DEFAULT_MAX_MOVES: usize = 500;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plays seeded grid-chase games with a bot and audits every state")]
struct Cli {
    /// classic, wander, or both
    #[arg(long)]
    variant: Option<String>,
    #[arg(long)]
    games: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_moves: Option<usize>,
    #[arg(long)]
    dots: Option<usize>,
    #[arg(long)]
    pellets: Option<usize>,
    /// Print the final board of every game to stderr
    #[arg(long)]
    render: bool,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct Scenario {
    name: String,
    seed: u32,
    max_moves: usize,
    config: GameConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Won,
    GameOver,
    Unfinished,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    variant: Variant,
    seed: u32,
    outcome: Outcome,
    moves: usize,
    score: u32,
    #[serde(rename = "livesLeft")]
    lives_left: i32,
    #[serde(rename = "dotsLeft")]
    dots_left: usize,
    #[serde(rename = "dotsEaten")]
    dots_eaten: usize,
    #[serde(rename = "pelletsTaken")]
    pellets_taken: usize,
    captures: usize,
    #[serde(rename = "livesLost")]
    lives_lost: usize,
    #[serde(rename = "rejectedMoves")]
    rejected_moves: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    #[serde(rename = "move")]
    move_index: usize,
    message: String,
}

#[derive(Clone, Debug)]
struct ScenarioRunResult {
    result: ScenarioResultLine,
    anomaly_records: Vec<AnomalyRecord>,
    final_snapshot: Snapshot,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    details: Value,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let scenarios = match resolve_scenarios(&cli) {
        Ok(scenarios) => scenarios,
        Err(message) => {
            emit_log(
                "error",
                "invalid_arguments",
                "-",
                None,
                None,
                json!({ "error": message }),
            );
            std::process::exit(2);
        }
    };
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed_hint, run_started_at_ms));

    let mut has_anomaly = false;
    let mut total_anomalies = 0usize;
    let mut scenario_results = Vec::new();

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            json!({
                "variant": scenario.config.variant,
                "gridSize": scenario.config.grid_size,
                "dots": scenario.config.num_dots,
                "pellets": scenario.config.num_pellets,
                "maxMoves": scenario.max_moves,
            }),
        );

        let scenario_run = match run_scenario(&scenario) {
            Ok(run) => run,
            Err(err) => {
                emit_log(
                    "error",
                    "config_invalid",
                    &run_id,
                    Some(&scenario.name),
                    Some(scenario.seed),
                    json!({ "error": err.to_string() }),
                );
                std::process::exit(2);
            }
        };

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(&scenario.name),
                Some(scenario.seed),
                json!({
                    "move": anomaly.move_index,
                    "message": anomaly.message,
                }),
            );
        }
        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();

        if cli.render {
            for row in render_board(&scenario_run.final_snapshot) {
                eprintln!("{row}");
            }
            eprintln!("{}", status_line(&scenario_run.final_snapshot));
        }

        emit_log(
            "info",
            "scenario_finished",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            json!({
                "outcome": scenario_run.result.outcome,
                "moves": scenario_run.result.moves,
                "score": scenario_run.result.score,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&scenario_run.result) {
            Ok(line) => println!("{line}"),
            Err(err) => log::error!("failed to serialize scenario result: {err}"),
        }
        scenario_results.push(scenario_run.result);
    }

    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        now_ms(),
        scenario_results,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(err) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": err.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_scenario(
    scenario: &Scenario,
) -> Result<ScenarioRunResult, grid_chase::error::ConfigError> {
    let mut engine = GridChaseEngine::new(scenario.config.clone(), scenario.seed)?;
    let mut bot_rng = Rng::new(scenario.seed ^ 0x9e37_79b9);

    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut dots_eaten = 0;
    let mut pellets_taken = 0;
    let mut captures = 0;
    let mut lives_lost = 0;
    let mut rejected_moves = 0;
    let mut moves = 0;

    let mut previous = engine.build_snapshot(true);
    for message in collect_snapshot_anomalies(None, &previous) {
        push_anomaly(&mut anomalies, &mut anomaly_records, &mut anomaly_seen, 0, message);
    }

    while moves < scenario.max_moves && !previous.is_terminal() {
        let dir = choose_direction(&previous, &mut bot_rng);
        engine.move_player(dir);
        moves += 1;
        let snapshot = engine.build_snapshot(true);

        for message in collect_snapshot_anomalies(Some(&previous), &snapshot) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                moves,
                message,
            );
        }
        for event in &snapshot.events {
            match event {
                GameEvent::DotEaten { .. } => dots_eaten += 1,
                GameEvent::PelletTaken { .. } => pellets_taken += 1,
                GameEvent::PursuerCaptured { .. } => captures += 1,
                GameEvent::LifeLost { .. } => lives_lost += 1,
                GameEvent::MoveRejected { .. } => rejected_moves += 1,
                _ => {}
            }
        }
        previous = snapshot;
    }

    // A finished game must ignore further input.
    if previous.is_terminal() {
        let before = engine.snapshot();
        if let Some(dir) = grid_chase::types::Direction::ALL.first() {
            let after = engine.move_player(*dir);
            if after != before {
                push_anomaly(
                    &mut anomalies,
                    &mut anomaly_records,
                    &mut anomaly_seen,
                    moves,
                    "terminal state changed after a move".to_string(),
                );
            }
        }
    }

    let outcome = if previous.won {
        Outcome::Won
    } else if previous.game_over {
        Outcome::GameOver
    } else {
        Outcome::Unfinished
    };

    Ok(ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            variant: scenario.config.variant,
            seed: scenario.seed,
            outcome,
            moves,
            score: previous.score,
            lives_left: previous.lives,
            dots_left: previous.dots.len(),
            dots_eaten,
            pellets_taken,
            captures,
            lives_lost,
            rejected_moves,
            anomalies,
        },
        anomaly_records,
        final_snapshot: previous,
    })
}

fn collect_snapshot_anomalies(
    previous: Option<&Snapshot>,
    snapshot: &Snapshot,
) -> Vec<String> {
    let mut anomalies = Vec::new();

    if !snapshot.is_walkable(snapshot.player) {
        anomalies.push(format!("player on illegal cell {:?}", snapshot.player));
    }
    for pursuer in &snapshot.pursuers {
        if !snapshot.is_walkable(pursuer.cell) {
            anomalies.push(format!(
                "pursuer {} on illegal cell {:?}",
                pursuer.id, pursuer.cell
            ));
        }
    }
    for cell in snapshot.dots.iter().chain(snapshot.pellets.iter()) {
        if !snapshot.is_walkable(*cell) {
            anomalies.push(format!("collectible on illegal cell {cell:?}"));
        }
        if *cell == snapshot.player {
            anomalies.push(format!("collectible left under the player at {cell:?}"));
        }
    }

    if snapshot.lives < 0 || snapshot.lives > snapshot.max_lives {
        anomalies.push(format!(
            "lives out of range: {}/{}",
            snapshot.lives, snapshot.max_lives
        ));
    }
    if (snapshot.lives == 0) != snapshot.game_over {
        anomalies.push(format!(
            "lives {} disagree with game over flag {}",
            snapshot.lives, snapshot.game_over
        ));
    }
    if snapshot.vulnerable_timer < 0 || (snapshot.vulnerable_timer > 0) != snapshot.vulnerable {
        anomalies.push(format!(
            "vulnerability timer {} disagrees with flag {}",
            snapshot.vulnerable_timer, snapshot.vulnerable
        ));
    }

    if snapshot.variant == Variant::Wander {
        let cells: HashSet<Cell> = snapshot.pursuers.iter().map(|p| p.cell).collect();
        if cells.len() != snapshot.pursuers.len() {
            anomalies.push("wandering pursuers share a cell".to_string());
        }
    }

    if let Some(previous) = previous {
        let previous_dots: HashSet<Cell> = previous.dots.iter().copied().collect();
        let previous_pellets: HashSet<Cell> = previous.pellets.iter().copied().collect();
        if snapshot.dots.iter().any(|cell| !previous_dots.contains(cell)) {
            anomalies.push("dot set grew".to_string());
        }
        if snapshot
            .pellets
            .iter()
            .any(|cell| !previous_pellets.contains(cell))
        {
            anomalies.push("pellet set grew".to_string());
        }
        if snapshot.score < previous.score {
            anomalies.push(format!(
                "score dropped from {} to {}",
                previous.score, snapshot.score
            ));
        }
        if snapshot.lives > previous.lives {
            anomalies.push("lives increased".to_string());
        }
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Result<Vec<Scenario>, String> {
    let seed = fold_seed(cli.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }));
    let variants = match cli.variant.as_deref() {
        None | Some("both") => vec![Variant::Classic, Variant::Wander],
        Some(raw) => vec![Variant::parse(raw).ok_or_else(|| format!("unknown variant {raw}"))?],
    };
    let games = cli.games.unwrap_or(DEFAULT_GAMES).clamp(1, 1_000);
    let max_moves = cli.max_moves.unwrap_or(DEFAULT_MAX_MOVES).clamp(1, 100_000);

    let mut scenarios = Vec::new();
    for variant in variants {
        let mut config = GameConfig::preset(variant);
        if let Some(dots) = cli.dots {
            config.num_dots = dots;
        }
        if let Some(pellets) = cli.pellets {
            config.num_pellets = pellets;
        }
        let label = match variant {
            Variant::Classic => "classic",
            Variant::Wander => "wander",
        };
        for game in 0..games {
            scenarios.push(Scenario {
                name: format!("{label}-{}", game + 1),
                seed: seed.wrapping_add(game as u32),
                max_moves,
                config: config.clone(),
            });
        }
    }
    Ok(scenarios)
}

fn fold_seed(seed: u64) -> u32 {
    seed as u32
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    move_index: usize,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        move_index,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn outcome_key(outcome: Outcome) -> String {
    match outcome {
        Outcome::Won => "won",
        Outcome::GameOver => "game_over",
        Outcome::Unfinished => "unfinished",
    }
    .to_string()
}

fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_score = 0u64;
    for scenario in &scenarios {
        *outcome_counts.entry(outcome_key(scenario.outcome)).or_insert(0) += 1;
        total_score += scenario.score as u64;
    }
    let average_score = if scenario_count == 0 {
        0
    } else {
        (total_score / scenario_count as u64) as u32
    };
    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        scenario_count,
        anomaly_count,
        average_score,
        outcome_counts,
        scenarios,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        details,
    };
    match serde_json::to_string(&log_line) {
        Ok(line) => eprintln!("{line}"),
        Err(err) => log::error!("failed to serialize log line for {event}: {err}"),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

//! aim-probe: run the aiming pipeline headless and print the results as JSON.
//!
//! Usage:
//!   aim-probe solve --scene level.json --kind Direct --config aim.json
//!   aim-probe random --seed 7
//!   aim-probe run --seed 7 --ticks 3600

use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use volley_autoaim::analyzer::analyze_scene;
use volley_autoaim::selector::select_target;
use volley_autoaim::solver::solve;
use volley_core::commands::SandboxCommand;
use volley_core::config::AimConfig;
use volley_core::enums::{LevelOutcome, ProjectileKind};
use volley_sim::world_setup::{random_fortress, Scenario};
use volley_sim::{SimConfig, SimulationEngine};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "solve" => cmd_solve(&args[2..]),
        "random" => cmd_random(&args[2..]),
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "aim-probe: headless auto-aim probe\n\
         \n\
         Commands:\n\
         \n\
         solve     Analyze a scenario and solve one shot\n\
         \n\
           --scene <path>     Scenario JSON file\n\
           --kind <kind>      Direct | Accelerating | AreaEffect (default: first queued)\n\
           --config <path>    Aim config JSON (optional)\n\
         \n\
         random    Print a seeded random fortress as scenario JSON\n\
         \n\
           --seed <N>         RNG seed (default: 42)\n\
         \n\
         run       Play a level with auto-aim on and print the outcome and score\n\
         \n\
           --seed <N>         Random fortress seed (default: 42)\n\
           --scene <path>     Scenario JSON file instead of a random fortress\n\
           --ticks <N>        Tick limit (default: 3600)\n\
           --config <path>    Aim config JSON (optional)\n"
    );
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .map(|pair| pair[1].as_str())
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match parse_value(args, flag) {
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: {flag} expects a number, got {raw}");
                process::exit(1);
            }
        },
        None => default,
    }
}

fn parse_kind(raw: &str) -> Option<ProjectileKind> {
    ProjectileKind::ALL
        .into_iter()
        .find(|kind| format!("{kind:?}").eq_ignore_ascii_case(raw))
}

fn load_config(args: &[String]) -> AimConfig {
    let Some(path) = parse_value(args, "--config") else {
        return AimConfig::default();
    };
    match AimConfig::from_path(PathBuf::from(path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn load_scenario(path: &str) -> Scenario {
    match Scenario::from_path(PathBuf::from(path)) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

// --- Solve command ---

fn cmd_solve(args: &[String]) {
    let Some(scene_path) = parse_value(args, "--scene") else {
        eprintln!("Error: --scene <path> is required");
        process::exit(1);
    };
    let scenario = load_scenario(scene_path);
    let config = load_config(args);

    let kind = match parse_value(args, "--kind") {
        Some(raw) => match parse_kind(raw) {
            Some(kind) => kind,
            None => {
                eprintln!("Error: unknown projectile kind {raw}");
                process::exit(1);
            }
        },
        None => scenario.projectiles[0],
    };

    let engine = SimulationEngine::with_scenario(
        SimConfig {
            aim: config,
            ..Default::default()
        },
        &scenario,
    );
    let frame = engine.frame();
    let descriptors = analyze_scene(&frame, &config.occlusion);
    let Some(target) = select_target(kind, &descriptors, frame.launch_point, &config.selection, &[]) else {
        eprintln!("No live target in scene");
        process::exit(2);
    };

    eprintln!(
        "Solving {kind:?} against #{} at ({:.0}, {:.0})",
        target.id.0, target.position.x, target.position.y
    );
    let result = solve(frame.launch_point, target, kind, &config);
    print_json(&result);
    if !result.valid {
        process::exit(2);
    }
}

// --- Random command ---

fn cmd_random(args: &[String]) {
    use rand::SeedableRng;

    let seed: u64 = parse_number(args, "--seed", 42);
    let scenario = random_fortress(&mut rand_chacha::ChaCha8Rng::seed_from_u64(seed));
    print_json(&scenario);
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let seed: u64 = parse_number(args, "--seed", 42);
    let ticks: u64 = parse_number(args, "--ticks", 3600);
    let config = SimConfig {
        seed,
        aim: load_config(args),
        auto_aim: true,
    };

    let mut engine = match parse_value(args, "--scene") {
        Some(path) => SimulationEngine::with_scenario(config, &load_scenario(path)),
        None => SimulationEngine::with_random_fortress(config),
    };
    engine.queue_command(SandboxCommand::SetAutoAim { enabled: true });

    let mut last = None;
    for _ in 0..ticks {
        let snapshot = engine.tick();
        for event in &snapshot.aim_events {
            eprintln!("[{:>6}] {}", snapshot.time.tick, serde_json::to_string(event).unwrap_or_default());
        }
        let done = snapshot.outcome != LevelOutcome::InProgress;
        last = Some(snapshot);
        if done {
            break;
        }
    }

    let Some(snapshot) = last else {
        eprintln!("Error: --ticks must be positive");
        process::exit(1);
    };
    print_json(&serde_json::json!({
        "outcome": snapshot.outcome,
        "ticks": snapshot.time.tick,
        "targets_left": snapshot.scene.live_target_count(),
        "score": snapshot.score,
        "hit_ratio": snapshot.score.hit_ratio(),
        "stats": snapshot.auto_aim.stats,
    }));
}

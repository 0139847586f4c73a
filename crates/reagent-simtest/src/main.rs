//! Reagent Headless Simulation Harness
//!
//! Validates solution math, injector behavior, liver metabolism and
//! injector state replication against the shipped prototype data.
//! Runs entirely in-process with no transport or rendering.
//!
//! Usage:
//!   cargo run -p reagent-simtest
//!   cargo run -p reagent-simtest -- --verbose
//!   cargo run -p reagent-simtest -- --seed 42

use std::collections::HashMap;
use std::sync::Arc;

use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reagent_core::config::{EngineConfig, InjectorConfig, LiverConfig};
use reagent_core::prelude::*;
use reagent_core::replication::{DisplayMirror, INJECTOR_WIRE_SIZE};
use reagent_logic::{transfer, TransferError};

// ── Prototype data (same JSON a game would load) ────────────────────────
const PROTOTYPES_JSON: &str = include_str!("../../../data/reagent_prototypes.json");
const INJECTORS_JSON: &str = include_str!("../../../data/injectors.json");

const DEFAULT_SEED: u64 = 0x5eed_1037;
const SWEEP_ROUNDS: usize = 2_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    println!("=== Reagent Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Prototype data validation
    let registry = match ReagentRegistry::from_json(PROTOTYPES_JSON) {
        Ok(registry) => {
            results.push(check(
                "prototypes_parse",
                true,
                format!("{} prototypes loaded", registry.len()),
            ));
            Arc::new(registry)
        }
        Err(e) => {
            results.push(check("prototypes_parse", false, format!("{}", e)));
            report(&results, verbose);
            return;
        }
    };
    results.extend(validate_prototype_data(&registry, verbose));

    // 2. Random transfer sweep
    results.extend(validate_transfer_sweep(seed, verbose));

    // 3. Metabolism over time
    results.extend(validate_metabolism(&registry, verbose));

    // 4. Syringe cycle mirrored to a display
    results.extend(validate_replication(&registry, verbose));

    report(&results, verbose);
}

fn report(results: &[TestResult], verbose: bool) {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Prototype Data ───────────────────────────────────────────────────

fn validate_prototype_data(registry: &ReagentRegistry, verbose: bool) -> Vec<TestResult> {
    println!("--- Prototype Data ---");
    let mut results = Vec::new();

    let missing: Vec<_> = ["Ethanol", "Sugar", "Toxin", "Water"]
        .into_iter()
        .filter(|id| registry.lookup(id).is_none())
        .collect();
    results.push(check(
        "prototypes_core_reagents",
        missing.is_empty(),
        if missing.is_empty() {
            "all core reagents registered".to_string()
        } else {
            format!("missing: {}", missing.join(", "))
        },
    ));

    let inert = registry
        .lookup("Water")
        .map(|p| p.metabolism().is_empty())
        .unwrap_or(false);
    results.push(check("prototypes_water_inert", inert, "water has no metabolism"));

    let injectors: HashMap<String, InjectorConfig> = match serde_json::from_str(INJECTORS_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(check("injectors_parse", false, format!("JSON parse error: {}", e)));
            return results;
        }
    };
    let invalid: Vec<_> = injectors
        .iter()
        .filter_map(|(name, cfg)| cfg.validate().err().map(|e| format!("{}: {}", name, e)))
        .collect();
    results.push(check(
        "injectors_valid",
        invalid.is_empty() && !injectors.is_empty(),
        if invalid.is_empty() {
            format!("{} injector prototypes valid", injectors.len())
        } else {
            invalid.join("; ")
        },
    ));

    let zero = InjectorConfig::from_json(r#"{"transferAmount": 0}"#);
    results.push(check(
        "injectors_reject_zero_transfer",
        zero.is_err(),
        "transferAmount 0 rejected",
    ));

    let duplicate = ReagentRegistry::from_json(r#"[{"id": "Water"}, {"id": "Water"}]"#);
    results.push(check(
        "prototypes_reject_duplicates",
        duplicate.is_err(),
        "duplicate ids rejected",
    ));

    if verbose {
        let mut names: Vec<_> = injectors.keys().cloned().collect();
        names.sort();
        println!("  injector prototypes: {}", names.join(", "));
    }

    results
}

// ── 2. Transfer Sweep ───────────────────────────────────────────────────

fn random_solution(rng: &mut StdRng, ids: &[&str]) -> Solution {
    let mut solution = Solution::with_capacity(rng.gen_range(0..=40));
    for id in ids {
        if rng.gen_bool(0.6) {
            solution.add_reagent(*id, rng.gen_range(1..=15));
        }
    }
    solution
}

fn validate_transfer_sweep(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Transfer Sweep (seed {:#x}) ---", seed);
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let ids = ["Water", "Ethanol", "Sugar", "Iron", "Toxin"];

    let mut inconsistent = 0;
    let mut mass_lost = 0;
    let mut over_clamp = 0;
    let mut mutated_on_error = 0;
    let mut outcomes: HashMap<&'static str, usize> = HashMap::new();

    for _ in 0..SWEEP_ROUNDS {
        let mut source = random_solution(&mut rng, &ids);
        let mut dest = random_solution(&mut rng, &ids);
        let requested: u32 = rng.gen_range(0..=20);

        let before_source = source.clone();
        let before_dest = dest.clone();
        let limit = requested
            .min(source.current_volume())
            .min(dest.empty_volume());

        match transfer(&mut source, &mut dest, requested) {
            Ok(moved) => {
                *outcomes.entry("ok").or_default() += 1;
                if moved != limit || moved == 0 {
                    over_clamp += 1;
                }
                for id in ids {
                    let before = before_source.quantity_of(id) + before_dest.quantity_of(id);
                    let after = source.quantity_of(id) + dest.quantity_of(id);
                    if before != after {
                        mass_lost += 1;
                    }
                }
            }
            Err(err) => {
                let key = match err {
                    TransferError::Underflow => "underflow",
                    TransferError::Overflow => "overflow",
                    TransferError::Rejected { .. } => "rejected",
                };
                *outcomes.entry(key).or_default() += 1;
                if source != before_source || dest != before_dest {
                    mutated_on_error += 1;
                }
            }
        }

        if !source.is_consistent() || !dest.is_consistent() {
            inconsistent += 1;
        }
    }

    results.push(check(
        "sweep_invariants",
        inconsistent == 0,
        format!("{} inconsistent solutions in {} rounds", inconsistent, SWEEP_ROUNDS),
    ));
    results.push(check(
        "sweep_conservation",
        mass_lost == 0,
        format!("{} per-reagent mismatches", mass_lost),
    ));
    results.push(check(
        "sweep_clamp",
        over_clamp == 0,
        format!("{} transfers moved other than min(requested, available, headroom)", over_clamp),
    ));
    results.push(check(
        "sweep_errors_leave_state",
        mutated_on_error == 0,
        format!("{} failed transfers mutated a solution", mutated_on_error),
    ));
    results.push(check(
        "sweep_coverage",
        ["ok", "underflow", "overflow"]
            .iter()
            .all(|k| outcomes.get(k).copied().unwrap_or(0) > 0),
        format!("{:?}", outcomes),
    ));

    if verbose {
        let mut keys: Vec<_> = outcomes.iter().collect();
        keys.sort();
        for (outcome, count) in keys {
            println!("  {:>10}: {}", outcome, count);
        }
    }

    results
}

// ── 3. Metabolism ───────────────────────────────────────────────────────

fn validate_metabolism(registry: &Arc<ReagentRegistry>, verbose: bool) -> Vec<TestResult> {
    println!("--- Metabolism ---");
    let mut results = Vec::new();

    let mut engine = ChemistryEngine::new(registry.clone());
    let patient = engine.spawn_patient(&LiverConfig::default(), Position::default());
    let mut dose = Solution::with_capacity(20);
    dose.add_reagent("Ethanol", 5);
    dose.add_reagent("Toxin", 10);
    dose.add_reagent("Water", 3);
    let accepted = engine.dose_liver(patient, dose).is_ok();
    results.push(check("dose_accepted", accepted, "18u dose fits a 20u liver"));

    let quantities = |engine: &ChemistryEngine| -> (u32, u32, u32) {
        engine
            .world
            .get::<&Liver>(patient)
            .map(|l| {
                let s = l.internal();
                (s.quantity_of("Ethanol"), s.quantity_of("Toxin"), s.quantity_of("Water"))
            })
            .unwrap_or_default()
    };

    // Toxin carries two effects; only the last one (7u) counts
    engine.update(1.0);
    let after_one = quantities(&engine);
    results.push(check(
        "metabolism_last_effect_wins",
        after_one == (4, 3, 3),
        format!("(ethanol, toxin, water) = {:?}", after_one),
    ));

    for _ in 0..10 {
        engine.update(1.0);
    }
    let after_many = quantities(&engine);
    results.push(check(
        "metabolism_clears_and_spares_water",
        after_many == (0, 0, 3),
        format!("(ethanol, toxin, water) = {:?}", after_many),
    ));

    // Sub-interval frames accumulate
    let throttled = EngineConfig::from_json(r#"{"metabolismInterval": 2.0}"#);
    match throttled {
        Ok(config) => {
            let mut engine = ChemistryEngine::with_config(registry.clone(), config);
            let patient = engine.spawn_patient(&LiverConfig::default(), Position::default());
            let mut dose = Solution::with_capacity(10);
            dose.add_reagent("Ethanol", 10);
            let _ = engine.dose_liver(patient, dose);

            let volume = |engine: &ChemistryEngine| {
                engine
                    .world
                    .get::<&Liver>(patient)
                    .map(|l| l.internal().current_volume())
                    .unwrap_or(0)
            };
            for _ in 0..3 {
                engine.update(0.5);
            }
            let before = volume(&engine);
            engine.update(0.5);
            let after = volume(&engine);
            results.push(check(
                "metabolism_throttled",
                before == 10 && after == 8,
                format!("{}u before interval, {}u after", before, after),
            ));
        }
        Err(e) => results.push(check("metabolism_throttled", false, format!("{}", e))),
    }

    if verbose {
        println!("  sim time {:.1}s, {} liver(s)", engine.sim_time(), engine.liver_count());
    }

    results
}

// ── 4. Replication ──────────────────────────────────────────────────────

fn validate_replication(registry: &Arc<ReagentRegistry>, verbose: bool) -> Vec<TestResult> {
    println!("--- Replication ---");
    let mut results = Vec::new();

    let mut engine = ChemistryEngine::new(registry.clone());
    let user = engine.world.spawn((Position::default(),));
    let tool = engine.spawn_injector(
        &InjectorConfig {
            inject_only: false,
            max_volume: 10,
            ..Default::default()
        },
        Position::default(),
    );
    let bottle = engine.spawn_container(SolutionContainer::injectable(50).with_reagent("Ethanol", 50));
    let patient = engine.spawn_patient(&LiverConfig::default(), Position::default());

    let mut mirror = DisplayMirror::new();
    let mut lines = Vec::new();
    let mut payload_sizes = Vec::new();
    let mut notices = Vec::new();

    let mut sync = |engine: &mut ChemistryEngine, mirror: &mut DisplayMirror, lines: &mut Vec<String>| {
        engine.update(0.0);
        for message in engine.drain_outbox() {
            payload_sizes.push(message.payload.len());
            if let Err(e) = mirror.receive(&message) {
                lines.push(format!("error: {}", e));
            }
        }
        if let Some(line) = mirror.status_mut(tool).and_then(|s| s.refresh()) {
            lines.push(line);
        }
    };
    let mut apply = |engine: &mut ChemistryEngine, target: Entity| {
        notices.push(engine.handle_interaction(InteractionEvent {
            user,
            tool,
            target: Some(target),
        }));
    };

    sync(&mut engine, &mut mirror, &mut lines);
    apply(&mut engine, bottle);
    sync(&mut engine, &mut mirror, &mut lines);
    sync(&mut engine, &mut mirror, &mut lines);
    apply(&mut engine, bottle);
    engine.handle_use(UseEvent { user, tool });
    sync(&mut engine, &mut mirror, &mut lines);
    apply(&mut engine, patient);
    apply(&mut engine, patient);
    apply(&mut engine, patient);
    sync(&mut engine, &mut mirror, &mut lines);

    results.push(check(
        "syringe_cycle",
        notices
            == [
                Some(InjectorNotice::Drew(5)),
                Some(InjectorNotice::Drew(5)),
                Some(InjectorNotice::Injected(5)),
                Some(InjectorNotice::Injected(5)),
                Some(InjectorNotice::ContainerEmpty),
            ],
        format!("{:?}", notices),
    ));

    let expected = [
        "Volume: 0/10 | Draw",
        "Volume: 5/10 | Draw",
        "Volume: 10/10 | Inject",
        "Volume: 0/10 | Inject",
    ];
    results.push(check(
        "replication_status_lines",
        lines == expected,
        format!("{:?}", lines),
    ));
    results.push(check(
        "replication_payload_size",
        payload_sizes.iter().all(|&n| n == INJECTOR_WIRE_SIZE),
        format!("{} payloads of {:?} bytes", payload_sizes.len(), payload_sizes),
    ));
    results.push(check(
        "replication_only_on_change",
        payload_sizes.len() == 4,
        format!("{} payloads for 4 changed ticks", payload_sizes.len()),
    ));

    let garbage = mirror.status_mut(tool).map(|s| s.apply_payload(&[0u8; 5]).is_err());
    results.push(check(
        "replication_rejects_garbage",
        garbage == Some(true),
        "short payload rejected",
    ));

    if verbose {
        for popup in engine.drain_notifications() {
            println!("  popup → {}", popup.text);
        }
        for line in &lines {
            println!("  display → {}", line);
        }
    }

    results
}

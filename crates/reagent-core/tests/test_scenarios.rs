//! End-to-end scenarios through the engine's public API.
//!
//! Exercises: config JSON → registry JSON → spawn → use/interaction events
//! → metabolism ticks → replication payloads → display status.

use std::sync::Arc;

use reagent_core::config::{EngineConfig, InjectorConfig, LiverConfig};
use reagent_core::prelude::*;
use reagent_core::registry::{ConstantMetabolism, ReagentPrototype};
use reagent_core::replication::DisplayMirror;

// ── Helpers ────────────────────────────────────────────────────────────

const PROTOTYPES: &str = r#"[
    { "id": "Ethanol", "metabolism": [ { "type": "fixed_rate", "rate": 1.0 } ] },
    { "id": "Water" }
]"#;

struct Harness {
    engine: ChemistryEngine,
    user: hecs::Entity,
}

impl Harness {
    fn new(registry: ReagentRegistry) -> Self {
        let mut engine = ChemistryEngine::new(Arc::new(registry));
        let user = engine.world.spawn((Position::default(),));
        Self { engine, user }
    }

    fn injector(&mut self, json: &str, reagent: &str, amount: u32) -> hecs::Entity {
        let config = InjectorConfig::from_json(json).unwrap();
        let tool = self.engine.spawn_injector(&config, Position::new(4.0, 2.0, 1));
        self.engine
            .world
            .get::<&mut Injector>(tool)
            .unwrap()
            .internal_mut()
            .add_reagent(reagent, amount);
        tool
    }

    fn apply(&mut self, tool: hecs::Entity, target: hecs::Entity) -> Option<InjectorNotice> {
        self.engine.handle_interaction(InteractionEvent {
            user: self.user,
            tool,
            target: Some(target),
        })
    }

    fn injector_volume(&self, tool: hecs::Entity) -> u32 {
        self.engine
            .world
            .get::<&Injector>(tool)
            .unwrap()
            .internal()
            .current_volume()
    }

    fn container_volume(&self, container: hecs::Entity) -> u32 {
        self.engine
            .world
            .get::<&SolutionContainer>(container)
            .unwrap()
            .solution
            .current_volume()
    }
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn inject_clamps_to_target_headroom() {
    let mut h = Harness::new(ReagentRegistry::from_json(PROTOTYPES).unwrap());
    let tool = h.injector(r#"{"maxVolume": 10}"#, "Water", 10);
    let beaker = h
        .engine
        .spawn_container(SolutionContainer::injectable(10).with_reagent("Ethanol", 7));

    assert_eq!(h.apply(tool, beaker), Some(InjectorNotice::Injected(3)));
    assert_eq!(h.injector_volume(tool), 7);
    assert_eq!(h.container_volume(beaker), 10);

    let popups = h.engine.drain_notifications();
    assert_eq!(popups.len(), 1);
    assert_eq!(popups[0].text, "Injected 3u");
    assert_eq!(popups[0].recipient, h.user);
    assert_eq!(popups[0].position, Position::new(4.0, 2.0, 1));
}

#[test]
fn draw_boundaries_do_not_mutate() {
    let mut h = Harness::new(ReagentRegistry::from_json(PROTOTYPES).unwrap());

    // Full injector drawing from a stocked beaker
    let full = h.injector(r#"{"injectOnly": false, "maxVolume": 10}"#, "Water", 10);
    let stocked = h
        .engine
        .spawn_container(SolutionContainer::injectable(30).with_reagent("Ethanol", 12));
    assert_eq!(h.apply(full, stocked), Some(InjectorNotice::ContainerFull));
    assert_eq!(h.injector_volume(full), 10);
    assert_eq!(h.container_volume(stocked), 12);

    // Empty injector drawing from an empty beaker
    let empty = h.injector(r#"{"injectOnly": false, "maxVolume": 10}"#, "Water", 0);
    let dry = h.engine.spawn_container(SolutionContainer::injectable(30));
    assert_eq!(h.apply(empty, dry), Some(InjectorNotice::ContainerEmpty));
    assert_eq!(h.injector_volume(empty), 0);
    assert_eq!(h.container_volume(dry), 0);
}

#[test]
fn inject_only_device_ignores_use() {
    let mut h = Harness::new(ReagentRegistry::from_json(PROTOTYPES).unwrap());
    let tool = h.injector("{}", "Water", 0);
    h.engine.update(0.0);
    h.engine.drain_outbox();

    for _ in 0..3 {
        assert!(h.engine.handle_use(UseEvent { user: h.user, tool }));
    }

    assert_eq!(
        h.engine.world.get::<&Injector>(tool).unwrap().mode(),
        InjectorMode::Inject
    );
    // Nothing changed, so nothing to replicate
    h.engine.update(0.0);
    assert!(h.engine.drain_outbox().is_empty());
}

#[test]
fn two_effects_on_one_reagent_remove_the_last_delta() {
    let registry = ReagentRegistry::builder()
        .prototype(
            ReagentPrototype::new("Toxin")
                .with_effect(ConstantMetabolism { amount: 2 })
                .with_effect(ConstantMetabolism { amount: 7 }),
        )
        .build()
        .unwrap();
    let mut h = Harness::new(registry);
    let patient = h
        .engine
        .spawn_patient(&LiverConfig::from_json("{}").unwrap(), Position::default());
    let tool = h.injector(r#"{"transferAmount": 15, "maxVolume": 15}"#, "Toxin", 15);

    assert_eq!(h.apply(tool, patient), Some(InjectorNotice::Injected(15)));
    h.engine.update(1.0);

    let liver = h.engine.world.get::<&Liver>(patient).unwrap();
    assert_eq!(liver.internal().quantity_of("Toxin"), 8);
}

#[test]
fn liver_fills_up_then_reports_full() {
    let mut h = Harness::new(ReagentRegistry::from_json(PROTOTYPES).unwrap());
    let patient = h
        .engine
        .spawn_patient(&LiverConfig { max_volume: 12 }, Position::default());
    let tool = h.injector(r#"{"maxVolume": 30}"#, "Water", 30);

    assert_eq!(h.apply(tool, patient), Some(InjectorNotice::Injected(5)));
    assert_eq!(h.apply(tool, patient), Some(InjectorNotice::Injected(5)));
    assert_eq!(h.apply(tool, patient), Some(InjectorNotice::Injected(2)));
    assert_eq!(h.apply(tool, patient), Some(InjectorNotice::ContainerFull));
    assert_eq!(h.injector_volume(tool), 18);
}

#[test]
fn ethanol_clears_over_time_water_stays() {
    let mut h = Harness::new(ReagentRegistry::from_json(PROTOTYPES).unwrap());
    let patient = h
        .engine
        .spawn_patient(&LiverConfig::default(), Position::default());
    let mut dose = Solution::with_capacity(10);
    dose.add_reagent("Ethanol", 4);
    dose.add_reagent("Water", 4);
    h.engine.dose_liver(patient, dose).unwrap();

    for _ in 0..10 {
        h.engine.update(1.0);
    }

    let liver = h.engine.world.get::<&Liver>(patient).unwrap();
    assert_eq!(liver.internal().quantity_of("Ethanol"), 0);
    assert_eq!(liver.internal().quantity_of("Water"), 4);
    assert!(liver.internal().is_consistent());
}

#[test]
fn display_tracks_authoritative_state() {
    let registry = ReagentRegistry::from_json(PROTOTYPES).unwrap();
    let config = EngineConfig::from_json(r#"{"metabolismInterval": 0.5}"#).unwrap();
    let mut engine = ChemistryEngine::with_config(Arc::new(registry), config);
    let user = engine.world.spawn(());
    let tool = engine.spawn_injector(
        &InjectorConfig::from_json(r#"{"injectOnly": false, "maxVolume": 10}"#).unwrap(),
        Position::default(),
    );
    let beaker = engine.spawn_container(SolutionContainer::injectable(20).with_reagent("Water", 20));
    let mut mirror = DisplayMirror::new();

    let mut sync = |engine: &mut ChemistryEngine, mirror: &mut DisplayMirror| {
        engine.update(0.1);
        for message in engine.drain_outbox() {
            mirror.receive(&message).unwrap();
        }
    };

    sync(&mut engine, &mut mirror);
    assert_eq!(
        mirror.status_mut(tool).unwrap().refresh(),
        Some("Volume: 0/10 | Draw".to_string())
    );

    engine.handle_interaction(InteractionEvent {
        user,
        tool,
        target: Some(beaker),
    });
    sync(&mut engine, &mut mirror);
    assert_eq!(
        mirror.status_mut(tool).unwrap().refresh(),
        Some("Volume: 5/10 | Draw".to_string())
    );

    // No changes: nothing to redraw
    sync(&mut engine, &mut mirror);
    assert_eq!(mirror.status_mut(tool).unwrap().refresh(), None);

    engine.handle_use(UseEvent { user, tool });
    sync(&mut engine, &mut mirror);
    assert_eq!(
        mirror.status_mut(tool).unwrap().refresh(),
        Some("Volume: 5/10 | Inject".to_string())
    );
}

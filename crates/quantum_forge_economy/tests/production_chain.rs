//! # Production Chain Verification
//!
//! Plays the shipped catalog from raw ore to a solved puzzle board and checks
//! the economy's guarantees along the way:
//!
//! 1. **Golden path**: raws -> compounds -> precursors -> crystals -> win
//! 2. **Atomicity**: a failed multi-kind spend changes nothing
//! 3. **Exclusivity**: a busy station refuses a second recipe
//! 4. **Refunds**: removing a crystal returns it to the ledger
//! 5. **Catalog validation**: production cycles are rejected at load
//!
//! Run with: cargo test --test production_chain -- --nocapture

use quantum_forge_economy::{
    BuildingArchetype, EconomyConfig, EconomyError, EconomyEvent, EconomySystem,
    ResourceAmount, ResourceKind, StartOutcome, StationId, DEFAULT_TARGET,
};

use ResourceKind::{
    Cadmium, Carbon, Copper, CopperWire, Iron, QuantumDotBlue, QuantumDotGreen, QuantumDotRed,
    QuantumDotYellow, Selenium, Silicon, Steel, Sulfur, Zinc,
};

/// Runs `recipe_id` on `station` `times` times, one full duration per run.
fn craft(economy: &mut EconomySystem, station: StationId, recipe_id: &str, times: usize) {
    let duration = economy
        .catalog()
        .get(recipe_id)
        .map(|r| r.duration_secs())
        .unwrap();

    for run in 0..times {
        assert_eq!(
            economy.start_recipe(station, recipe_id).unwrap(),
            StartOutcome::Started,
            "{recipe_id} run {run} did not start"
        );
        let done = economy.tick(duration).unwrap();
        assert_eq!(done.len(), 1, "{recipe_id} run {run} did not complete");
        assert_eq!(done[0].recipe_id, recipe_id);
    }
}

fn harvest_raws(economy: &mut EconomySystem) {
    for (kind, amount) in [
        (Iron, 20),
        (Carbon, 10),
        (Copper, 10),
        (Silicon, 20),
        (Cadmium, 12),
        (Selenium, 12),
        (Zinc, 8),
        (Sulfur, 8),
    ] {
        economy.harvest(kind, amount).unwrap();
    }
}

// ============================================================================
// GOLDEN PATH
// ============================================================================

#[test]
fn verify_golden_path_from_ore_to_win() {
    let mut economy = EconomySystem::with_builtin_catalog().unwrap();
    assert_eq!(economy.balance(Iron), 10);

    let smelter = economy
        .place_building(BuildingArchetype::Smelter)
        .unwrap()
        .unwrap();
    harvest_raws(&mut economy);

    craft(&mut economy, smelter, "steel", 5);
    craft(&mut economy, smelter, "copper_wire", 3);
    craft(&mut economy, smelter, "silicon_wafer", 7);
    assert_eq!(economy.balance(Steel), 5);
    assert_eq!(economy.balance(CopperWire), 6);

    let chem_lab = economy
        .place_building(BuildingArchetype::ChemLab)
        .unwrap()
        .unwrap();
    let fab = economy
        .place_building(BuildingArchetype::QuantumFab)
        .unwrap()
        .unwrap();
    assert_eq!(economy.balance(Steel), 0);

    craft(&mut economy, chem_lab, "cadmium_selenide", 11);
    craft(&mut economy, chem_lab, "zinc_sulfide", 7);

    craft(&mut economy, fab, "quantum_dot_red", 4);
    craft(&mut economy, fab, "quantum_dot_blue", 2);
    craft(&mut economy, fab, "quantum_dot_green", 2);
    craft(&mut economy, fab, "quantum_dot_yellow", 1);
    economy.drain_events();

    for (y, row) in DEFAULT_TARGET.iter().enumerate() {
        for (x, kind) in row.iter().enumerate() {
            assert!(!economy.is_solved());
            assert!(economy.place_crystal(x, y, *kind).unwrap());
        }
    }
    assert!(economy.is_solved());

    for crystal in [QuantumDotRed, QuantumDotGreen, QuantumDotBlue, QuantumDotYellow] {
        assert_eq!(economy.balance(crystal), 0, "{crystal} left over");
    }

    let solved = economy
        .drain_events()
        .into_iter()
        .filter(|e| *e == EconomyEvent::PuzzleSolved)
        .count();
    assert_eq!(solved, 1);

    println!("Golden path complete: puzzle solved with {} stations", economy.stations().count());
}

// ============================================================================
// LEDGER AND STATION GUARANTEES
// ============================================================================

#[test]
fn verify_failed_spend_is_atomic() {
    let mut economy = EconomySystem::with_builtin_catalog().unwrap();
    let before = economy.ledger().snapshot();

    // Iron is covered, Steel is not.
    let paid = economy
        .spend(&[ResourceAmount::new(Iron, 1), ResourceAmount::new(Steel, 1)])
        .unwrap();
    assert!(!paid);
    assert_eq!(economy.ledger().snapshot(), before);
    assert_eq!(economy.pending_event_count(), 0);
}

#[test]
fn verify_steel_round_trip() {
    let mut economy = EconomySystem::with_builtin_catalog().unwrap();
    let smelter = economy
        .place_building(BuildingArchetype::Smelter)
        .unwrap()
        .unwrap();
    let (iron, carbon) = (economy.balance(Iron), economy.balance(Carbon));

    assert!(economy.is_craftable("steel"));
    economy.start_recipe(smelter, "steel").unwrap();
    assert_eq!(economy.balance(Iron), iron - 2);
    assert_eq!(economy.balance(Carbon), carbon - 1);

    for _ in 0..3 {
        economy.tick(1.0).unwrap();
    }
    assert_eq!(economy.balance(Steel), 1);
    assert!(economy.station(smelter).is_some_and(|s| !s.is_crafting()));
}

#[test]
fn verify_frame_loop_completes_on_time() {
    let mut economy = EconomySystem::with_builtin_catalog().unwrap();
    let smelter = economy
        .place_building(BuildingArchetype::Smelter)
        .unwrap()
        .unwrap();
    economy.start_recipe(smelter, "steel").unwrap();

    // 3.0s of 60 Hz frames.
    for frame in 1..180 {
        assert!(economy.tick(1.0 / 60.0).unwrap().is_empty(), "early at frame {frame}");
    }
    assert_eq!(economy.tick(1.0 / 60.0).unwrap().len(), 1);
    assert_eq!(economy.balance(Steel), 1);
}

#[test]
fn verify_station_exclusivity_and_permissions() {
    let mut economy = EconomySystem::with_builtin_catalog().unwrap();
    let smelter = economy
        .place_building(BuildingArchetype::Smelter)
        .unwrap()
        .unwrap();
    let wall = economy
        .place_building(BuildingArchetype::Wall)
        .unwrap()
        .unwrap();

    assert!(economy.start_recipe(smelter, "steel").unwrap().is_started());
    let snapshot = economy.ledger().snapshot();
    assert_eq!(
        economy.start_recipe(smelter, "copper_wire").unwrap(),
        StartOutcome::Busy
    );
    assert_eq!(
        economy.start_recipe(wall, "copper_wire").unwrap(),
        StartOutcome::NotPermitted
    );
    assert_eq!(economy.ledger().snapshot(), snapshot);
}

#[test]
fn verify_crystal_refund() {
    let mut economy = EconomySystem::with_builtin_catalog().unwrap();
    economy.harvest(QuantumDotGreen, 1).unwrap();

    assert!(economy.place_crystal(0, 1, QuantumDotGreen).unwrap());
    assert_eq!(economy.balance(QuantumDotGreen), 0);
    assert_eq!(economy.crystal_at(0, 1).unwrap(), Some(QuantumDotGreen));

    assert!(economy.remove_crystal(0, 1).unwrap());
    assert_eq!(economy.balance(QuantumDotGreen), 1);
    assert_eq!(economy.crystal_at(0, 1).unwrap(), None);
    assert_eq!(
        economy.place_crystal(0, 3, QuantumDotGreen),
        Err(EconomyError::OutOfBounds { x: 0, y: 3 })
    );
}

// ============================================================================
// CATALOG VALIDATION
// ============================================================================

#[test]
fn verify_cyclic_catalog_rejected() {
    let source = r#"
        [[recipes]]
        id = "forge"
        name = "Forge"
        category = "compound"
        duration = 1.0
        inputs = { Iron = 1 }
        outputs = { Steel = 1 }

        [[recipes]]
        id = "melt"
        name = "Melt"
        category = "compound"
        duration = 1.0
        inputs = { Steel = 1 }
        outputs = { Iron = 1 }
    "#;

    let config = EconomyConfig::from_toml_str(source).unwrap();
    match EconomySystem::new(&config) {
        Err(EconomyError::CycleDetected(path)) => {
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"forge".to_string()));
            assert!(path.contains(&"melt".to_string()));
        }
        Err(other) => panic!("expected a cycle, got {other}"),
        Ok(_) => panic!("cyclic catalog accepted"),
    }
}

#[test]
fn verify_unknown_kind_rejected() {
    let source = r#"
        [starting_grant]
        Gold = 5
    "#;
    assert!(matches!(
        EconomyConfig::from_toml_str(source),
        Err(EconomyError::InvalidConfig(_))
    ));
}

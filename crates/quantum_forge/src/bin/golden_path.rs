//! Golden path demo.
//!
//! Plays one scripted session on the shipped catalog: mine nodes, build the
//! production chain, craft every crystal the puzzle needs and fill the board.
//!
//! Run with: `RUST_LOG=debug cargo run --bin golden_path`

use quantum_forge::{GameSession, PlayerCommand, ResourceNode, SessionPhase};
use quantum_forge_economy::{
    BuildingArchetype, EconomyError, EconomyEvent, EconomyResult, ResourceKind, StationId,
    DEFAULT_TARGET,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Simulated frame length in seconds.
const FRAME_DT: f32 = 0.5;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Quantum Forge v{}", env!("CARGO_PKG_VERSION"));

    match run() {
        Ok(SessionPhase::Won) => info!("=== Puzzle solved, session won ==="),
        Ok(SessionPhase::Playing) => warn!("script finished without solving the puzzle"),
        Err(e) => {
            warn!(error = %e, "golden path aborted");
            std::process::exit(1);
        }
    }
}

fn run() -> EconomyResult<SessionPhase> {
    let mut session = GameSession::with_builtin_catalog()?;

    info!("=== Mining ===");
    let mut nodes = [
        ResourceNode::new(ResourceKind::Iron, 20, 3)?,
        ResourceNode::new(ResourceKind::Carbon, 10, 2)?,
        ResourceNode::new(ResourceKind::Copper, 10, 2)?,
        ResourceNode::new(ResourceKind::Silicon, 20, 4)?,
        ResourceNode::new(ResourceKind::Cadmium, 12, 3)?,
        ResourceNode::new(ResourceKind::Selenium, 12, 3)?,
        ResourceNode::new(ResourceKind::Zinc, 8, 2)?,
        ResourceNode::new(ResourceKind::Sulfur, 8, 2)?,
    ];
    for node in &mut nodes {
        while !node.is_depleted() {
            if let Some(total) = session.hit_node(node)? {
                info!(kind = %node.kind(), total, "node mined out");
            }
        }
    }

    info!("=== Compounds ===");
    let smelter = build(&mut session, BuildingArchetype::Smelter)?;
    craft(&mut session, smelter, "steel", 5)?;
    craft(&mut session, smelter, "copper_wire", 3)?;
    craft(&mut session, smelter, "silicon_wafer", 7)?;

    info!("=== Precursors ===");
    let chem_lab = build(&mut session, BuildingArchetype::ChemLab)?;
    let fab = build(&mut session, BuildingArchetype::QuantumFab)?;
    craft(&mut session, chem_lab, "cadmium_selenide", 11)?;
    craft(&mut session, chem_lab, "zinc_sulfide", 7)?;

    info!("=== Crystals ===");
    craft(&mut session, fab, "quantum_dot_red", 4)?;
    craft(&mut session, fab, "quantum_dot_blue", 2)?;
    craft(&mut session, fab, "quantum_dot_green", 2)?;
    craft(&mut session, fab, "quantum_dot_yellow", 1)?;

    info!("=== Puzzle ===");
    for (y, row) in DEFAULT_TARGET.iter().enumerate() {
        for (x, kind) in row.iter().enumerate() {
            session.apply(PlayerCommand::SelectCrystal(*kind))?;
            if !session.apply(PlayerCommand::ClickCell { x, y })? {
                warn!(x, y, %kind, "crystal not placed");
            }
        }
    }

    let solved = session
        .drain_events()
        .iter()
        .any(|e| *e == EconomyEvent::PuzzleSolved);
    info!(solved, "puzzle checked");
    Ok(session.phase())
}

fn build(session: &mut GameSession, archetype: BuildingArchetype) -> EconomyResult<StationId> {
    session.build(archetype)?.ok_or_else(|| {
        EconomyError::InvalidConfig(format!("cannot afford {archetype} on the golden path"))
    })
}

/// Runs a recipe `times` times, ticking frames until each run completes.
fn craft(
    session: &mut GameSession,
    station: StationId,
    recipe_id: &str,
    times: usize,
) -> EconomyResult<()> {
    for _ in 0..times {
        if !session.start_recipe(station, recipe_id)?.is_started() {
            return Err(EconomyError::InvalidConfig(format!(
                "{recipe_id} could not start on {station}"
            )));
        }
        while session.update(FRAME_DT)?.is_empty() {}
    }
    info!(recipe = recipe_id, times, "batch crafted");
    Ok(())
}

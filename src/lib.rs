//! Math Tower core crate.
//!
//! Arithmetic drill game: every correctly solved problem adds a floor to a
//! growing building, a wrong answer collapses it, and every 10th attempted
//! floor is a harder boss problem. The engine (generation, progression,
//! building model, evaluation) is pure Rust and runs under native `cargo
//! test`; `start_game()` boots the browser presentation on top of it.

use wasm_bindgen::prelude::*;

pub mod game;

// Re-export the engine surface so integration tests and embedders don't need
// to spell out the module paths.
pub use game::building::{Building, BuildingLayout, FloorKind, FloorRecord};
pub use game::evaluate::{Outcome, evaluate};
pub use game::phase::{Phase, PhaseEvent};
pub use game::problem::{Operation, OperationSelection, Problem, generate};
pub use game::progress::{MemoryScore, ProgressionState, ScoreStore};
pub use game::rng::Lcg;
pub use game::session::Session;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_tower_mode()
}

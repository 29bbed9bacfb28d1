//! Minesweeper player that deduces safe cells and mines from linear
//! equations over the unknown cells, guessing only when no certain move is
//! left.
//!
//! The player drives any [`Board`]; [`MineMap`] is the in-memory board used
//! for simulation and tests. Cells are addressed by [`Coordinate`] and stored
//! row-major: `cells[y * columns + x]`.

pub mod board;
pub mod config;
pub mod equation;
pub mod guess;
pub mod index;
pub mod mine_map;
pub mod rng;
pub mod set;
pub mod solver;
pub mod types;

pub use board::{Board, Strategy};
pub use config::{ConfigError, GameConfig, SolverConfig};
pub use equation::{Equation, EquationError};
pub use index::EquationIndex;
pub use mine_map::MineMap;
pub use rng::GameRng;
pub use set::OrderedSet;
pub use solver::{play, EquationSolver, EquationStrategy};
pub use types::{Coordinate, Look};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::board::Board;
    use crate::config::GameConfig;
    use crate::mine_map::MineMap;
    use crate::solver;

    /// Play one game with the equation solver.
    /// Takes `{ columns, rows, mines, seed? }`.
    /// Returns JS object: `{ won: bool, probed: bool, cells: Int8Array }`
    /// where `cells` holds the final look codes, row-major.
    #[wasm_bindgen(js_name = "playGame")]
    pub fn wasm_play_game(config: JsValue) -> Result<JsValue, JsValue> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        let mut map = MineMap::generate(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        solver::play(&mut map);

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"won".into(), &map.won().into())?;
        js_sys::Reflect::set(&obj, &"probed".into(), &map.probed().into())?;

        let codes = map.look_codes();
        let cells = js_sys::Int8Array::new_with_length(codes.len() as u32);
        cells.copy_from(&codes);
        js_sys::Reflect::set(&obj, &"cells".into(), &cells.into())?;

        Ok(obj.into())
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM equation solver ready".to_string()
    }
}

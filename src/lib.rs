#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Corner fillets for bulge-encoded polylines.
//!
//! The geometry lives in [`geom`]; [`FilletEngine`] exposes it to JavaScript
//! hosts through `wasm-bindgen`, and [`snapshot`] renders stable text output
//! for the `fillet_cli` tool and the tests.

pub mod geom;
pub mod snapshot;

use std::fmt;

use geom::{Chain, FilletChainDiagnostics, FilletError, FilletReport, Tolerance, fillet_chain};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("er is geen polyline geladen")]
    NoChain,

    #[error("tolerantie moet een eindig positief getal zijn: {eps}")]
    InvalidTolerance { eps: f64 },

    #[error(transparent)]
    Fillet(#[from] FilletError),
}

/// Stateful fillet session for JavaScript hosts.
///
/// The engine owns one chain at a time; each fillet call edits it in place and
/// a failed call leaves it untouched.
#[wasm_bindgen]
pub struct FilletEngine {
    initialized: bool,
    chain: Option<Chain>,
    tolerance: Tolerance,
}

impl Default for FilletEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FilletEngine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> FilletEngine {
        FilletEngine {
            initialized: true,
            chain: None,
            tolerance: Tolerance::default_geom(),
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Laad een polyline (`{ vertices: [{ point, bulge }], closed }`) in de engine.
    #[wasm_bindgen]
    pub fn load_chain(&mut self, value: JsValue) -> Result<(), JsValue> {
        let chain: Chain = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        self.set_chain(chain);
        Ok(())
    }

    /// Aantal vertices van de geladen polyline, of 0 zonder polyline.
    #[wasm_bindgen]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.chain.as_ref().map_or(0, Chain::len)
    }

    /// Stel de geometrische tolerantie in voor volgende fillet-aanroepen.
    #[wasm_bindgen]
    pub fn set_tolerance(&mut self, eps: f64) -> Result<(), JsValue> {
        self.apply_tolerance(eps).map_err(to_js_error)
    }

    /// Rond één hoek af en geef het fillet-rapport terug.
    #[wasm_bindgen]
    pub fn fillet_vertex(&mut self, index: usize, radius: f64) -> Result<JsValue, JsValue> {
        let report = self.fillet_corner(index, radius).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&report).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Rond alle hoeken af met dezelfde straal en geef de diagnostiek terug.
    #[wasm_bindgen]
    pub fn fillet_all(&mut self, radius: f64) -> Result<JsValue, JsValue> {
        let diagnostics = self.fillet_corners(radius).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&diagnostics)
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Haal de huidige polyline op.
    #[wasm_bindgen]
    pub fn get_chain(&self) -> Result<JsValue, JsValue> {
        let chain = self.chain.as_ref().ok_or_else(|| to_js_error(EngineError::NoChain))?;
        serde_wasm_bindgen::to_value(chain).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl FilletEngine {
    pub fn set_chain(&mut self, chain: Chain) {
        debug_log!("load_chain: {} vertices, closed {}", chain.len(), chain.is_closed());
        self.chain = Some(chain);
    }

    #[must_use]
    pub fn chain(&self) -> Option<&Chain> {
        self.chain.as_ref()
    }

    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn apply_tolerance(&mut self, eps: f64) -> Result<(), EngineError> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(EngineError::InvalidTolerance { eps });
        }
        self.tolerance = Tolerance::new(eps);
        Ok(())
    }

    pub fn fillet_corner(&mut self, index: usize, radius: f64) -> Result<FilletReport, EngineError> {
        let tol = self.tolerance;
        let chain = self.chain.as_mut().ok_or(EngineError::NoChain)?;
        Ok(chain.fillet_vertex(index, radius, tol)?)
    }

    pub fn fillet_corners(&mut self, radius: f64) -> Result<FilletChainDiagnostics, EngineError> {
        let chain = self.chain.as_ref().ok_or(EngineError::NoChain)?;
        let (filleted, diagnostics) = fillet_chain(chain, radius, self.tolerance)?;
        debug_log!(
            "fillet_all: {} of {} corners rounded",
            diagnostics.filleted_corner_count,
            diagnostics.corner_count
        );
        self.chain = Some(filleted);
        Ok(diagnostics)
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

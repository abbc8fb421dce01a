//! Application entry point for the tubule substrate viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use tubule_core::SubstrateConfig;
use viewer::{SUBSTRATE_HEIGHT, SUBSTRATE_WIDTH, Viewer};

/// Starts the native eframe application.
///
/// An optional first argument names a JSON config file; without it a
/// 400×400 substrate with default options is used. Log output is
/// controlled with `RUST_LOG`.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the config is rejected or eframe fails to create the
///   native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions::default();
    let config_path = std::env::args().nth(1);

    eframe::run_native(
        "Tubule Substrate",
        options,
        Box::new(move |_cc| {
            let cfg = match config_path {
                Some(path) => SubstrateConfig::from_json(&std::fs::read_to_string(path)?)?,
                None => SubstrateConfig::new(SUBSTRATE_WIDTH, SUBSTRATE_HEIGHT),
            };
            Ok(Box::new(Viewer::new(cfg)?))
        }),
    )
}

mod app;
mod bridge;
mod catalog;
mod config;
mod engine;
mod mpris;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG-gated; silent by default so the TUI stays clean. Redirect
    // stderr to a file when debugging.
    env_logger::init();

    runtime::run()
}

// Chunk: docs/chunks/session_runner - Two-pane replica session runner
//!
//! twin-edit-demo: runs the scripted two-pane session and prints each step.
//!
//! Usage: `twin-edit-demo [config.json]`. Without an argument the config is
//! read from the platform config directory, falling back to defaults.

use std::io;
use std::path::PathBuf;

use log::info;

use twin_edit::{Session, SessionConfig, Side};
use twin_edit_demo::{demo_script, run};
use twin_edit_engine::LocalEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => SessionConfig::load_from(&PathBuf::from(path))?,
        None => SessionConfig::load(),
    }
    .apply_env();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .init();
    info!("starting, link {}", if config.start_online { "online" } else { "offline" });

    let mut session = Session::new(LocalEngine::new(), &config);
    let stdout = io::stdout();
    run(&mut session, &demo_script(), &mut stdout.lock())?;

    for side in Side::BOTH {
        println!("final [{}]: {:?}", side, session.plain_text(side));
    }
    Ok(())
}

//! Flood-Alert Monitoring Service - Main Daemon
//!
//! A server-side daemon that continuously:
//! 1. Polls the remote record store for hydrological readings
//! 2. Validates each reading and rejects malformed rows
//! 3. Classifies readings into severity levels with descriptions
//! 4. Logs critical readings and feed staleness
//! 5. Serves the classified feed over a small HTTP endpoint
//!
//! Usage:
//!   cargo run --release                    # Poll loop without HTTP endpoint
//!   cargo run --release -- --endpoint 8080 # Poll loop + endpoint on port 8080
//!   cargo run --release -- --once          # One refresh cycle, then exit
//!
//! Environment:
//!   HIDROMON_STORE_KEY - record store API key (optional for public stores)

use hidromon_service::config;
use hidromon_service::daemon::Daemon;
use hidromon_service::endpoint;
use hidromon_service::logging::{self, LogLevel, Source};
use std::env;

fn main() {
    println!("🌊 Hidromon - Servicio de Alerta de Inundaciones");
    println!("================================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut run_once = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                if i + 1 < args.len() {
                    endpoint_port = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --endpoint requires a port number");
                    std::process::exit(1);
                }
            }
            "--once" => {
                run_once = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--endpoint PORT] [--once]", args[0]);
                std::process::exit(1);
            }
        }
    }

    logging::init_logger(LogLevel::Info, None);

    let config = config::load_config();
    println!("📊 Store: {} (table {})", config.store.base_url, config.store.table);

    let daemon = Daemon::from_config(&config);

    println!("📋 Verifying record store...");
    if let Err(e) = daemon.initialize() {
        eprintln!("\n❌ Initialization failed: {}\n", e);
        eprintln!("Check hidromon.toml and HIDROMON_STORE_KEY in .env\n");
        std::process::exit(1);
    }
    println!("✓ Store reachable\n");

    if run_once {
        match daemon.refresh() {
            Ok(rows) => println!("✓ Refresh complete: {} readings classified", rows.len()),
            Err(e) => {
                eprintln!("❌ Refresh failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Start HTTP endpoint if requested (in background thread)
    if let Some(port) = endpoint_port {
        println!("🚀 Starting HTTP endpoint server...");
        let endpoint_config = config.clone();
        std::thread::spawn(move || {
            if let Err(e) = endpoint::start_endpoint_server(port, endpoint_config) {
                logging::error(Source::System, &format!("Endpoint server error: {}", e));
            }
        });
        println!("   Endpoint running on http://0.0.0.0:{}\n", port);
    }

    println!("🔄 Starting continuous monitoring loop...");
    println!("   Poll interval: {} minutes", config.daemon.poll_interval_minutes);
    println!("   Press Ctrl+C to stop\n");

    if let Err(e) = daemon.run() {
        eprintln!("\n❌ Daemon error: {}", e);
        std::process::exit(1);
    }
}

//! CLI for inspecting binding manifests.
//!
//! Usage:
//!   just-bind <manifest.toml>                       # Print the prototype layout
//!   just-bind --config <engine.toml> <manifest.toml> # Build under the configured heap budget
//!
//! Log output goes to stderr and honours `RUST_LOG` (e.g. `RUST_LOG=just_bind=debug`).

use just_bind::runner::plugin::config::EngineConfig;
use just_bind::runner::plugin::manifest::BindingManifest;
use just_bind::runner::plugin::registry::HostFunctionTable;
use just_bind::runner::plugin::types::EvalContext;
use std::env;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();

    match args.len() {
        2 => {
            let arg = &args[1];
            if arg == "-h" || arg == "--help" {
                print_usage();
                process::exit(0);
            }
            inspect(None, arg);
        }
        4 if args[1] == "-c" || args[1] == "--config" => {
            inspect(Some(&args[2]), &args[3]);
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn print_usage() {
    eprintln!("just-bind - binding manifest inspector");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  just-bind <manifest.toml>                          Print the prototype layout");
    eprintln!("  just-bind --config <engine.toml> <manifest.toml>   Use an engine config");
}

fn inspect(config_path: Option<&str>, manifest_path: &str) {
    let config = match config_path {
        Some(path) => match EngineConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error: {}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::new(),
    };

    let manifest = match BindingManifest::load(Path::new(manifest_path)) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Manifest error: {}", e);
            process::exit(1);
        }
    };

    let mut ctx = EvalContext::with_config(&config);
    // No host is linked in: every function name binds to an inert placeholder.
    let functions = HostFunctionTable::for_inspection();
    match manifest.build(&mut ctx.heap, &functions) {
        Ok(prototype) => {
            print!("{}", prototype);
            println!("heap: {} bytes charged", ctx.heap.get_allocated());
        }
        Err(e) => {
            eprintln!("Build error: {}", e);
            process::exit(1);
        }
    }
}

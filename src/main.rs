//! Microgrid simulator entry point: CLI wiring and a random-policy episode.

use std::path::Path;
use std::process;

use rand::{SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

use microgrid_sim::config::MicrogridConfig;
use microgrid_sim::env::{GridEnv, NegativeTotalCost};
use microgrid_sim::io::export::export_csv;
use microgrid_sim::io::series::index_data_folder;
use microgrid_sim::sim::Microgrid;

/// Preset used when neither `--config` nor `--preset` is given.
const DEFAULT_PRESET: &str = "small";

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    seed: u64,
    duration: Option<f32>,
    logs_out: Option<String>,
    save_config: Option<String>,
    list_data: Option<String>,
    quiet: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
    #[cfg(feature = "tui")]
    tui: bool,
}

fn print_help() {
    eprintln!("microgrid-sim: discrete-time microgrid simulator");
    eprintln!();
    eprintln!("Usage: microgrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load microgrid from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        MicrogridConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Seed for noisy presets and random actions (default: 0)");
    eprintln!("  --duration <hours>       Size the battery to this many hours of mean load");
    eprintln!("  --logs-out <path>        Export energy and cost logs to CSV");
    eprintln!("  --save-config <path>     Write the final configuration as TOML");
    eprintln!("  --list-data <dir>        List the CSV series under each sub-folder of <dir> and exit");
    eprintln!("  --quiet                  Only print the final report");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the episode");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Play the episode in a live terminal UI");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the {DEFAULT_PRESET} preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following a flag, or exits with an error.
fn flag_value(args: &[String], i: usize, flag: &str, kind: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {kind} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        seed: 0,
        duration: None,
        logs_out: None,
        save_config: None,
        list_data: None,
        quiet: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
        #[cfg(feature = "tui")]
        tui: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                cli.config_path = Some(flag_value(&args, i, "--config", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "name"));
            }
            "--seed" => {
                i += 1;
                let v = flag_value(&args, i, "--seed", "u64");
                if let Ok(s) = v.parse::<u64>() {
                    cli.seed = s;
                } else {
                    eprintln!("error: --seed value \"{v}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--duration" => {
                i += 1;
                let v = flag_value(&args, i, "--duration", "number");
                if let Ok(h) = v.parse::<f32>() {
                    cli.duration = Some(h);
                } else {
                    eprintln!("error: --duration value \"{v}\" is not a valid number");
                    process::exit(1);
                }
            }
            "--logs-out" => {
                i += 1;
                cli.logs_out = Some(flag_value(&args, i, "--logs-out", "path"));
            }
            "--save-config" => {
                i += 1;
                cli.save_config = Some(flag_value(&args, i, "--save-config", "path"));
            }
            "--list-data" => {
                i += 1;
                cli.list_data = Some(flag_value(&args, i, "--list-data", "path"));
            }
            "--quiet" | "-q" => cli.quiet = true,
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let v = flag_value(&args, i, "--port", "u16");
                if let Ok(p) = v.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{v}\" is not a valid u16");
                    process::exit(1);
                }
            }
            #[cfg(feature = "tui")]
            "--tui" => {
                cli.tui = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration: `--config` takes priority, then `--preset`,
/// then the default preset.
fn load_config(cli: &CliArgs) -> (String, MicrogridConfig) {
    let loaded = if let Some(ref path) = cli.config_path {
        MicrogridConfig::from_toml_file(Path::new(path)).map(|c| (path.clone(), c))
    } else {
        let name = cli.preset.as_deref().unwrap_or(DEFAULT_PRESET);
        MicrogridConfig::from_preset(name, cli.seed).map(|c| (name.to_string(), c))
    };
    let (name, config) = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    (name, config)
}

/// Plays one episode with uniformly sampled actions and returns the
/// microgrid with its logs.
fn run_episode(microgrid: Microgrid, seed: u64, quiet: bool) -> Microgrid {
    let mut env = GridEnv::from_microgrid(microgrid, NegativeTotalCost);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut total_reward = 0.0_f32;

    while !env.microgrid().done() {
        let action = env.action_space().sample(&mut rng);
        let tr = env.step(action).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(1);
        });
        total_reward += tr.reward;
        if !quiet {
            println!(
                "t={:>5} | action=[{:>6.3}, {:>6.3}] | SoC={:>5.1}% | reward={:>12.2} \
                 (overcharge={:.2} grid={:.2} error={:.2})",
                env.microgrid().t(),
                action[0],
                action[1],
                tr.observation.soc() * 100.0,
                tr.reward,
                tr.costs.overcharge,
                tr.costs.grid,
                tr.costs.error,
            );
        }
    }

    println!("\nTotal reward: {total_reward:.2}");
    env.into_inner()
}

/// Prints the CSV series found under each sub-folder of `dir`.
fn list_data(dir: &Path) {
    let index = index_data_folder(dir).unwrap_or_else(|e| {
        eprintln!("error: cannot index \"{}\": {e}", dir.display());
        process::exit(1);
    });
    for (folder, files) in &index {
        let names: Vec<_> = files
            .iter()
            .filter_map(|f| f.file_name().and_then(|n| n.to_str()))
            .collect();
        println!("{folder}: {}", names.join(" "));
    }
}

fn main() {
    let cli = parse_args();
    init_tracing(cli.quiet);

    if let Some(ref dir) = cli.list_data {
        list_data(Path::new(dir));
        return;
    }

    let (name, config) = load_config(&cli);
    let mut microgrid = Microgrid::new(&config).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(hours) = cli.duration {
        if let Err(e) = microgrid.set_battery_from_duration(hours) {
            eprintln!("{e}");
            process::exit(1);
        }
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        let app = microgrid_sim::tui::runtime::App::new(&name, &microgrid.config(), cli.seed)
            .unwrap_or_else(|e| {
                eprintln!("{e}");
                process::exit(1);
            });
        if let Err(e) = microgrid_sim::tui::run(app) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
        return;
    }

    if !cli.quiet {
        eprintln!("Running \"{name}\" for {} steps", microgrid.max_timestep());
    }
    let microgrid = run_episode(microgrid, cli.seed, cli.quiet);

    println!("\n{}", microgrid.show_logs());

    if let Some(ref path) = cli.logs_out {
        if let Err(e) = export_csv(microgrid.get_logs(), Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Logs written to {path}");
    }

    if let Some(ref path) = cli.save_config {
        if let Err(e) = microgrid.save_config(Path::new(path)) {
            eprintln!("error: failed to save config: {e}");
            process::exit(1);
        }
        eprintln!("Configuration written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(microgrid_sim::api::AppState::from_microgrid(&microgrid));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(microgrid_sim::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use passtrack::catalog::Catalog;
use passtrack::config::Config;
use passtrack::predict::{ContactWindow, PairKey};
use passtrack::refresh::RefreshService;
use passtrack::store::{JsonStore, WindowStore};

#[derive(Parser)]
#[command(name = "passtrack")]
#[command(about = "Satellite contact window prediction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and catalog
    Validate {
        #[arg(long)]
        config: String,
    },
    /// Recompute contact windows for every satellite/station pair
    Refresh {
        #[arg(long)]
        config: String,
    },
    /// Recompute contact windows for a single pair
    Pair {
        #[arg(long)]
        config: String,
        #[arg(long)]
        satellite: String,
        #[arg(long)]
        station: String,
    },
    /// List persisted contact windows for a pair
    Windows {
        #[arg(long)]
        config: String,
        #[arg(long)]
        satellite: String,
        #[arg(long)]
        station: String,
    },
    /// Drop the persisted windows for a pair
    Purge {
        #[arg(long)]
        config: String,
        #[arg(long)]
        satellite: String,
        #[arg(long)]
        station: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Refresh { config } => refresh_all(&config).await,
        Commands::Pair {
            config,
            satellite,
            station,
        } => refresh_pair(&config, &satellite, &station).await,
        Commands::Windows {
            config,
            satellite,
            station,
        } => list_windows(&config, &satellite, &station).await,
        Commands::Purge {
            config,
            satellite,
            station,
        } => purge(&config, &satellite, &station).await,
    }
}

fn load(config_path: &str) -> Result<(Config, Arc<Catalog>), ExitCode> {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let catalog = match Catalog::load(&config.catalog.tle_folder, config.stations.clone()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    Ok((config, catalog))
}

fn build_service(config: &Config) -> RefreshService<JsonStore> {
    let store = Arc::new(JsonStore::new(config.store.base_folder.clone()));
    RefreshService::new(store, config.prediction, config.refresh)
}

fn validate(config_path: &str) -> ExitCode {
    let (config, catalog) = match load(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };

    println!(
        "Configuration is valid ({} satellites, {} stations)",
        catalog.satellites().len(),
        catalog.stations().len()
    );
    for station in catalog.stations() {
        println!(
            "  station {}: lat {:.4} lon {:.4} alt {:.0} m",
            station.id, station.latitude_deg, station.longitude_deg, station.altitude_m
        );
    }
    for satellite in catalog.satellites() {
        println!(
            "  satellite {}: {} ({:?}, epoch {})",
            satellite.id, satellite.name, satellite.classification, satellite.elements.epoch
        );
    }
    println!(
        "Scan: every {} s over {} min, threshold {} deg",
        config.prediction.step_seconds,
        config.prediction.horizon_minutes,
        config.prediction.min_elevation_deg
    );
    ExitCode::SUCCESS
}

async fn refresh_all(config_path: &str) -> ExitCode {
    let (config, catalog) = match load(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let service = build_service(&config);

    let report = service.refresh_all(&catalog).await;
    println!(
        "Refreshed {} pairs, {} windows persisted",
        report.refreshed, report.windows
    );

    if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        for failure in &report.failures {
            eprintln!("  {} failed: {}", failure.pair, failure.reason);
        }
        ExitCode::FAILURE
    }
}

async fn refresh_pair(config_path: &str, satellite_id: &str, station_id: &str) -> ExitCode {
    let (config, catalog) = match load(config_path) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let service = build_service(&config);

    let satellite = match catalog.satellite(satellite_id) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let station = match catalog.station(station_id) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match service.refresh_pair(satellite, station).await {
        Ok(outcome) => {
            println!(
                "{}: {} windows ({} inserted, {} updated, {} removed)",
                outcome.pair,
                outcome.windows.len(),
                outcome.summary.inserted,
                outcome.summary.updated,
                outcome.summary.removed
            );
            print_windows(&outcome.windows);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Refresh failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn list_windows(config_path: &str, satellite_id: &str, station_id: &str) -> ExitCode {
    // Reads the store only; no catalog needed for a lookup.
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let service = build_service(&config);

    let pair = PairKey::new(satellite_id, station_id);
    match service.list_windows(&pair).await {
        Ok(windows) if windows.is_empty() => {
            println!("{}: no persisted windows", pair);
            ExitCode::SUCCESS
        }
        Ok(windows) => {
            println!("{}: {} windows", pair, windows.len());
            print_windows(&windows);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Lookup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn purge(config_path: &str, satellite_id: &str, station_id: &str) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let store = JsonStore::new(config.store.base_folder.clone());

    let pair = PairKey::new(satellite_id, station_id);
    match store.delete_pair(&pair).await {
        Ok(removed) => {
            println!("{}: removed {} windows", pair, removed);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Purge failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_windows(windows: &[ContactWindow]) {
    for w in windows {
        println!(
            "  {} -> {}  peak {:.1} deg  {} s",
            w.scheduled_aos.format("%Y-%m-%dT%H:%M:%SZ"),
            w.scheduled_los.format("%Y-%m-%dT%H:%M:%SZ"),
            w.max_elevation_deg,
            w.duration_seconds
        );
    }
}

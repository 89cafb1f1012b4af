//! GymDesk - Gym Management
//!
//! Opens the configured backend and prints a schedule summary.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gymdesk::services::{GymService, Repositories};
use gymdesk::storage::config::{get_config_path, load_config, save_config};
use gymdesk::storage::{BackendKind, Database};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GymDesk v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("loading configuration")?;
    if !get_config_path().exists() {
        save_config(&config).context("writing default configuration")?;
        tracing::info!("Wrote default configuration to {}", get_config_path().display());
    }
    tracing::info!("Using {} backend", config.storage.backend);

    match config.storage.backend {
        BackendKind::Sqlite => {
            let db = Database::open(&config.database_path())
                .with_context(|| format!("opening {}", config.database_path().display()))?;
            let service = GymService::new(Repositories::sqlite(&db));
            summarize(&service)
        }
        BackendKind::Memory => {
            let service = GymService::new(Repositories::in_memory());
            summarize(&service)
        }
        BackendKind::File => {
            let repos = Repositories::in_memory()
                .with_file_records(&config.records_path())
                .with_context(|| format!("opening records in {}", config.records_path().display()))?;
            let service = GymService::new(repos);
            summarize(&service)
        }
    }
}

fn summarize(service: &GymService<'_>) -> anyhow::Result<()> {
    let classes = service.get_all_classes()?;
    let members = service.get_all_members()?;
    let trainers = service.trainers().list()?;
    tracing::info!(
        "{} classes, {} members, {} trainers",
        classes.len(),
        members.len(),
        trainers.len()
    );

    for class in service.sort_upcoming_classes_asc()? {
        let trainer = class
            .trainer
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("unassigned");
        println!(
            "{}  {:<20} {:<16} {}/{}",
            class.start_time.format("%Y-%m-%d %H:%M"),
            class.name,
            trainer,
            class.members.len(),
            class.participants_count
        );
    }

    Ok(())
}

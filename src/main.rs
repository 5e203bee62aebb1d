//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; booking rules live in BookingService and the domain checker.

use dotenv::dotenv;
use room_booking::adapters::persistence::{JsonSnapshotStore, MemoryStore};
use room_booking::adapters::sheet::CsvSheet;
use room_booking::adapters::ui::tui::TuiInputPort;
use room_booking::ports::{BookingStore, InputPort, SheetPort};
use room_booking::shared::AppConfig;
use room_booking::usecases::{BookingService, TransferService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    room_booking::adapters::ui::init_ui();

    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "invalid configuration, using defaults");
            AppConfig::default()
        }
    };

    // --- Store: JSON snapshot when configured, memory otherwise ---
    let store: Arc<dyn BookingStore> = match cfg.snapshot_path() {
        Some(path) => {
            info!(path = %path.display(), "snapshot persistence enabled");
            Arc::new(
                JsonSnapshotStore::open(&path)
                    .await
                    .map_err(|e| anyhow::anyhow!("open snapshot: {}", e))?,
            )
        }
        None => {
            info!("no snapshot configured; bookings last for this session only");
            Arc::new(MemoryStore::new())
        }
    };

    // --- Services ---
    let ending_soon_days = cfg.ending_soon_days_or_default();
    info!(ending_soon_days, "ending-soon window configured");
    let service = BookingService::new(Arc::clone(&store));
    let bookings = Arc::new(service.with_ending_soon_days(ending_soon_days));

    let sheet: Arc<dyn SheetPort> = Arc::new(CsvSheet::new());
    let transfer = Arc::new(TransferService::new(
        Arc::clone(&bookings),
        sheet,
        cfg.create_missing_or_default(),
    ));

    let sheet_path = cfg.export_path_or_default();
    info!(path = %sheet_path.display(), "default sheet path");

    let input_port: Arc<dyn InputPort> =
        Arc::new(TuiInputPort::new(bookings, transfer, sheet_path));

    // --- Run (main menu until Exit / Esc) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    info!("bye");
    Ok(())
}

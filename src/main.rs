// ============================================================================
// Dropouts - Point d'entrée
// ============================================================================
// Sert la page du token et rafraîchit ses statistiques toutes les 30s
//
// Déroulement :
// 1. Logging (fichier + console)
// 2. Configuration (dropouts.json si présent, sinon valeurs par défaut)
// 3. Tâche de rafraîchissement (premier cycle immédiat)
// 4. Serveur HTTP jusqu'à Ctrl-C
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use dropouts::aggregator::StatsAggregator;
use dropouts::board::StatsBoard;
use dropouts::config::AppConfig;
use dropouts::refresh::RefreshTask;
use dropouts::server::start_server;

/// Fichier de configuration optionnel, relatif au répertoire courant
const CONFIG_FILE: &str = "dropouts.json";

/// Initialise le logging vers fichier et console
///
/// Les logs sont écrits dans ./logs/dropouts.log (rotation quotidienne).
///
/// # Utilisation
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=dropouts=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "dropouts.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dropouts=debug,tower_http=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    let config = AppConfig::load(Path::new(CONFIG_FILE))?;
    info!(contract = %config.stats.contract_address, "Dropouts starting up");

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let result = runtime.block_on(run(config));

    match &result {
        Ok(_) => info!("Dropouts exited normally"),
        Err(e) => error!(error = ?e, "Dropouts exited with error"),
    }
    result
}

async fn run(config: AppConfig) -> Result<()> {
    let board = StatsBoard::new();
    let aggregator = Arc::new(
        StatsAggregator::new(config.stats.clone()).context("Échec de la création de l'agrégateur")?,
    );

    let refresh = RefreshTask::spawn(
        aggregator,
        board.clone(),
        config.stats.refresh_interval(),
        config.stats.cycle_deadline(),
    );

    let (server, _addr) = match start_server(&config.server, board).await {
        Ok(started) => started,
        Err(e) => {
            refresh.shutdown().await;
            return Err(e);
        }
    };

    tokio::signal::ctrl_c()
        .await
        .context("Échec de l'attente du signal Ctrl-C")?;
    info!("Shutdown requested");

    refresh.shutdown().await;
    server.abort();
    Ok(())
}

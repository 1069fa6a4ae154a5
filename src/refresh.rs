// ============================================================================
// RefreshTask : rafraîchissement périodique des statistiques
// ============================================================================
// Un cycle au démarrage, puis un cycle à chaque tick de l'intervalle.
//
// Les cycles sont sérialisés : la boucle attend la fin d'un cycle avant de
// lire le tick suivant, deux cycles ne peuvent donc jamais écrire en même
// temps. Les ticks manqués pendant un cycle long ne sont pas rattrapés.
//
// CONCEPTS RUST :
// 1. tokio::select! : attend la première de plusieurs futures
// 2. CancellationToken : arrêt coopératif, y compris au milieu d'un cycle
// 3. JoinHandle : le propriétaire du handle peut attendre la fin de la tâche
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregator::StatsAggregator;
use crate::board::StatsBoard;

/// Résultat d'un cycle, pour les logs et les tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Le snapshot a été publié
    Published,
    /// Le cycle a dépassé le délai : état de repli publié
    TimedOut,
}

/// Exécute un cycle et écrit le résultat dans les emplacements
///
/// Un cycle qui dépasse `deadline` est abandonné (les requêtes en cours sont
/// annulées au drop de la future) et remplacé par l'état de repli.
pub async fn run_cycle(aggregator: &StatsAggregator, board: &StatsBoard, deadline: Duration) -> CycleOutcome {
    match tokio::time::timeout(deadline, aggregator.fetch_token_stats()).await {
        Ok(snapshot) => {
            board.publish(snapshot).await;
            CycleOutcome::Published
        }
        Err(_) => {
            warn!(deadline_secs = deadline.as_secs_f64(), "Stats cycle timed out, showing fallback");
            board.apply_fallback().await;
            CycleOutcome::TimedOut
        }
    }
}

/// Handle de la tâche de rafraîchissement
pub struct RefreshTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Lance la boucle de rafraîchissement sur le runtime courant
    pub fn spawn(
        aggregator: Arc<StatsAggregator>,
        board: StatsBoard,
        interval: Duration,
        deadline: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Stats refresh task started");

            let cycles = drive(interval, token, |cycle| {
                let aggregator = Arc::clone(&aggregator);
                let board = board.clone();
                async move {
                    let outcome = run_cycle(&aggregator, &board, deadline).await;
                    debug!(cycle, ?outcome, "Stats cycle finished");
                }
            })
            .await;

            info!(cycles, "Stats refresh task stopped");
        });

        Self { cancel, handle }
    }

    /// Demande l'arrêt (le cycle en cours est abandonné)
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Annule puis attend la fin de la tâche
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Stats refresh task panicked");
        }
    }
}

/// Boucle de cadence : un cycle par tick, jamais deux à la fois
///
/// `cycle` reçoit le numéro du cycle (à partir de 1). Retourne le nombre de
/// cycles démarrés quand le token est annulé.
///
/// CONCEPT RUST : MissedTickBehavior::Skip
/// - Burst (défaut) rejouerait d'un coup les ticks manqués pendant un cycle long
/// - Skip sert un seul tick en retard dès la fin du cycle, puis reprend sur
///   la grille de l'intervalle : les autres ticks manqués sont abandonnés
async fn drive<F, Fut>(interval: Duration, token: CancellationToken, mut cycle: F) -> u64
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut cycles: u64 = 0;
    loop {
        // Le premier tick est immédiat : premier cycle au démarrage
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        cycles += 1;
        tokio::select! {
            _ = token.cancelled() => {
                debug!(cycle = cycles, "Cancelled during cycle");
                break;
            }
            _ = cycle(cycles) => {}
        }
    }

    cycles
}

// ============================================================================
// Tests unitaires
// ============================================================================

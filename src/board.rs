// ============================================================================
// StatsBoard : les emplacements d'affichage partagés
// ============================================================================
// Le dernier DisplaySnapshot rendu, partagé entre la tâche de
// rafraîchissement (écrivain) et le serveur HTTP (lecteurs).
//
// CONCEPT RUST : Arc<RwLock<T>>
// - Arc : ownership partagé entre tâches
// - tokio::sync::RwLock : plusieurs lecteurs OU un écrivain, sans bloquer
//   le thread (les gardes peuvent traverser un .await)
// ============================================================================

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::DisplaySnapshot;

/// Texte du compteur de holders quand tout le cycle a échoué
pub const FALLBACK_HOLDERS_TEXT: &str = "500+";

/// Texte de statut quand tout le cycle a échoué
pub const FALLBACK_STATUS_TEXT: &str = "Unable to fetch live data";

#[derive(Debug, Clone, Default)]
pub struct StatsBoard {
    inner: Arc<RwLock<DisplaySnapshot>>,
}

impl StatsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copie du rendu courant
    pub async fn snapshot(&self) -> DisplaySnapshot {
        self.inner.read().await.clone()
    }

    /// Écrase les cinq emplacements
    pub async fn publish(&self, snapshot: DisplaySnapshot) {
        *self.inner.write().await = snapshot;
        debug!("Published stats snapshot");
    }

    /// État minimal quand un cycle entier n'a rien produit
    ///
    /// Seuls holders et last-updated changent, les autres emplacements
    /// gardent leur texte précédent.
    pub async fn apply_fallback(&self) {
        let mut slots = self.inner.write().await;
        slots.holders = FALLBACK_HOLDERS_TEXT.to_string();
        slots.last_updated = FALLBACK_STATUS_TEXT.to_string();
    }
}

// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les clients des APIs publiques utilisées pour les
// statistiques du token :
// - BaseScan : liste des holders et transferts récents
// - DEX Screener : prix de la paire (source principale)
// - CoinGecko : prix du token (source secondaire)
// ============================================================================

pub mod basescan;    // Explorateur de blocs (holders, transferts)
pub mod coingecko;   // Prix, source secondaire
pub mod dexscreener; // Prix, source principale

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{StatsError, StatsResult};

/// User-Agent envoyé à toutes les APIs
const USER_AGENT: &str = concat!("dropouts/", env!("CARGO_PKG_VERSION"));

/// Crée le client HTTP partagé par toutes les sources
///
/// CONCEPT RUST : reqwest::Client est cloneable à moindre coût
/// - Il encapsule un pool de connexions derrière un Arc
/// - On le crée une fois et on le passe par référence
pub fn build_client(timeout: Duration) -> StatsResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| StatsError::Network(format!("client HTTP : {}", e)))
}

/// GET + vérification du statut HTTP + désérialisation JSON
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> StatsResult<T> {
    debug!(url = %url, "Sending HTTP request");
    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        error!(status = %status, url = %url, "API returned error status");
        return Err(StatsError::Network(format!("HTTP {} pour {}", status, url)));
    }

    // Lecture du corps puis parsing séparé : une erreur de forme JSON
    // devient MalformedResponse, pas Network
    let body = response.bytes().await?;
    let parsed = serde_json::from_slice(&body)?;
    Ok(parsed)
}

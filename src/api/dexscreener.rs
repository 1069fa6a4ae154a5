// ============================================================================
// API Client : DEX Screener
// ============================================================================
// Source principale du prix : paires DEX du token
//   GET {base}/{address} -> { "pairs": [ { "priceUsd": "0.00021", ... } ] }
// `pairs` vaut null quand le token n'est listé sur aucun DEX.
// ============================================================================

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api::get_json;
use crate::error::StatsResult;

#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pair {
    #[serde(default)]
    price_usd: Option<String>,
    #[serde(default)]
    price_native: Option<String>,
}

impl TokenPairsResponse {
    /// Prix de la première paire : priceUsd, sinon priceNative
    fn first_price(&self) -> Option<f64> {
        let pair = self.pairs.as_ref()?.first()?;
        let raw = pair
            .price_usd
            .as_deref()
            .or(pair.price_native.as_deref())?;
        let price: f64 = raw.trim().parse().ok()?;
        (price.is_finite() && price > 0.0).then_some(price)
    }
}

/// Récupère le prix du token depuis DEX Screener
///
/// # Retourne
/// * `Ok(Some(prix))` - prix positif trouvé
/// * `Ok(None)` - réponse valide mais sans prix exploitable
/// * `Err(_)` - erreur réseau ou JSON inattendu
#[instrument(skip(client, base_url))]
pub async fn fetch_price(
    client: &reqwest::Client,
    base_url: &str,
    address: &str,
) -> StatsResult<Option<f64>> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), address);
    let response: TokenPairsResponse = get_json(client, &url, &[]).await?;
    let price = response.first_price();
    debug!(?price, "DEX Screener price");
    Ok(price)
}

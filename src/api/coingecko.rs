// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Source secondaire du prix, utilisée quand DEX Screener n'a rien
//   GET {base}?contract_addresses={address}&vs_currencies=usd
//   -> { "0x...": { "usd": 0.00021 } }
// Un token inconnu donne un objet vide {}.
// ============================================================================

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api::get_json;
use crate::error::StatsResult;

#[derive(Debug, Deserialize)]
struct TokenQuote {
    #[serde(default)]
    usd: Option<f64>,
}

/// Récupère le prix USD du token depuis CoinGecko
///
/// Même contrat de retour que `dexscreener::fetch_price`.
#[instrument(skip(client, base_url))]
pub async fn fetch_price(
    client: &reqwest::Client,
    base_url: &str,
    address: &str,
) -> StatsResult<Option<f64>> {
    let query = [
        ("contract_addresses", address.to_string()),
        ("vs_currencies", "usd".to_string()),
    ];

    let quotes: HashMap<String, TokenQuote> = get_json(client, base_url, &query).await?;
    let price = quote_for(&quotes, address);
    debug!(?price, "CoinGecko price");
    Ok(price)
}

/// CoinGecko renvoie les adresses en minuscules
fn quote_for(quotes: &HashMap<String, TokenQuote>, address: &str) -> Option<f64> {
    let price = quotes.get(&address.to_lowercase())?.usd?;
    (price.is_finite() && price > 0.0).then_some(price)
}

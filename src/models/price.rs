// ============================================================================
// Structure : PriceResult
// ============================================================================
// Prix du token et valeurs dérivées (market cap, volume estimé)
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Prix, market cap et volume estimé
///
/// CONCEPT : market_cap est toujours dérivé du prix
/// - market_cap = price × total_supply (supply fixe supposée)
/// - On ne construit jamais un PriceResult avec une market cap arbitraire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceResult {
    pub price: f64,
    pub market_cap: f64,

    /// Volume synthétique (ou fixe en cas d'échec total), pas un volume observé
    pub volume: f64,

    /// false si le prix vient de la constante de repli
    pub is_real: bool,

    pub last_updated: DateTime<Utc>,
}

impl PriceResult {
    pub fn new(price: f64, total_supply: f64, volume: f64, is_real: bool) -> Self {
        Self {
            price,
            market_cap: price * total_supply,
            volume,
            is_real,
            last_updated: Utc::now(),
        }
    }

    /// Résultat d'échec total : prix de repli, volume fixe, non réel
    pub fn fallback(fallback_price: f64, total_supply: f64, fallback_volume: f64) -> Self {
        Self::new(fallback_price, total_supply, fallback_volume, false)
    }
}

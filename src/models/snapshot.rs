// ============================================================================
// Structure : DisplaySnapshot
// ============================================================================
// Rendu des trois résultats dans les cinq emplacements de la page
//
// Chaque emplacement correspond à un identifiant d'élément HTML fixe.
// Le snapshot ne vit que le temps d'un cycle : le suivant l'écrase.
// ============================================================================

use chrono::Local;
use serde::Serialize;

use crate::format::{format_large_number, format_last_updated, format_price, format_with_commas};
use crate::models::{HoldersResult, PriceResult, VolumeResult};

/// Texte affiché avant le premier cycle
pub const LOADING_TEXT: &str = "Loading...";

/// Les cinq textes affichés sur la page
///
/// CONCEPT RUST : #[serde(rename)]
/// - Les noms JSON sont les identifiants des éléments HTML
/// - Le script de la page fait simplement `getElementById(clé).textContent = valeur`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySnapshot {
    #[serde(rename = "price")]
    pub price: String,

    #[serde(rename = "holders")]
    pub holders: String,

    #[serde(rename = "market-cap")]
    pub market_cap: String,

    #[serde(rename = "volume")]
    pub volume: String,

    #[serde(rename = "last-updated")]
    pub last_updated: String,
}

impl Default for DisplaySnapshot {
    fn default() -> Self {
        Self {
            price: LOADING_TEXT.to_string(),
            holders: LOADING_TEXT.to_string(),
            market_cap: LOADING_TEXT.to_string(),
            volume: LOADING_TEXT.to_string(),
            last_updated: LOADING_TEXT.to_string(),
        }
    }
}

impl DisplaySnapshot {
    /// Formate les trois résultats d'un cycle
    ///
    /// Le volume affiché est celui des transferts 24h, pas l'estimation
    /// synthétique portée par PriceResult.
    pub fn render(price: &PriceResult, holders: &HoldersResult, volume: &VolumeResult) -> Self {
        let time = holders.last_updated.with_timezone(&Local);
        Self {
            price: format_price(price.price),
            holders: format_with_commas(holders.holders),
            market_cap: format!("${}", format_large_number(price.market_cap)),
            volume: format!("${}", format_large_number(volume.volume)),
            last_updated: format_last_updated(time, holders.is_real && volume.is_real),
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

// ============================================================================
// Structure : HoldersResult
// ============================================================================
// Nombre approximatif de holders, agrégé sur les pages de BaseScan
//
// CONCEPTS RUST :
// 1. Constructeurs nommés : `fetched()` pour la donnée réelle, `fallback()`
//    pour l'estimation de repli
// 2. Invariant : holders >= 1, garanti par les constructeurs
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Résultat de l'agrégation paginée des holders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldersResult {
    /// Nombre de holders comptés (au moins 1)
    pub holders: u64,

    /// true si au moins un enregistrement vient de l'API
    pub is_real: bool,

    pub last_updated: DateTime<Utc>,

    /// Nombre de pages effectivement récupérées
    pub total_pages: u32,
}

impl HoldersResult {
    /// Construit le résultat à partir des enregistrements récupérés
    ///
    /// Le compte est plafonné par le nombre de pages : ce n'est pas le
    /// vrai nombre de holders au-delà de page_size × max_pages.
    pub fn fetched(records: usize, total_pages: u32) -> Self {
        Self {
            holders: (records as u64).max(1),
            is_real: records > 0,
            last_updated: Utc::now(),
            total_pages,
        }
    }

    /// Estimation utilisée quand l'API est injoignable
    pub fn fallback(holders: u64) -> Self {
        Self {
            holders: holders.max(1),
            is_real: false,
            last_updated: Utc::now(),
            total_pages: 0,
        }
    }
}

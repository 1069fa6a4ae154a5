// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application :
// les trois résultats d'un cycle et leur rendu affichable
// ============================================================================

pub mod holders;  // Nombre de holders (BaseScan, paginé)
pub mod price;    // Prix, market cap, volume estimé
pub mod volume;   // Volume 24h sur les transferts récents
pub mod snapshot; // Rendu dans les cinq emplacements de la page

// Re-export des structures principales pour simplifier les imports
pub use holders::HoldersResult;
pub use price::PriceResult;
pub use snapshot::DisplaySnapshot;
pub use volume::VolumeResult;

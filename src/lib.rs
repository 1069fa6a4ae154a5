// ============================================================================
// Dropouts - Library
// ============================================================================
// Statistiques live du token Based Dropouts Crew et serveur de la page
// ============================================================================

pub mod config;     // Configuration explicite (adresse, intervalles, replis)
pub mod error;      // Taxonomie des erreurs d'API
pub mod models;     // Résultats et rendu affichable
pub mod api;        // Clients BaseScan, DEX Screener, CoinGecko
pub mod format;     // Formatage des prix et grands nombres
pub mod aggregator; // Agrégation des trois sources
pub mod board;      // Emplacements d'affichage partagés
pub mod refresh;    // Rafraîchissement périodique
pub mod server;     // Serveur de fichiers statiques + /api/stats

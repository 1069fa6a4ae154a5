// ============================================================================
// Module : error
// ============================================================================
// Erreurs des appels aux APIs publiques
//
// Trois familles, toutes traitées de la même manière par l'agrégateur :
// attrapées localement, loggées, puis remplacées par une valeur de repli.
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère l'implémentation de std::error::Error
// - #[error("...")] définit le message Display
// - #[from] génère la conversion automatique utilisée par l'opérateur ?
// ============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// Échec de transport ou statut HTTP non-2xx
    #[error("network failure: {0}")]
    Network(String),

    /// JSON qui ne correspond pas à la forme attendue
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Réponse valide mais sans donnée exploitable
    #[error("empty result: {0}")]
    EmptyResult(String),
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StatsError::MalformedResponse(err.to_string())
        } else {
            StatsError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::MalformedResponse(err.to_string())
    }
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;

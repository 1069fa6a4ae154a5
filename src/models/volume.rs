// ============================================================================
// Structure : VolumeResult
// ============================================================================
// Volume des dernières 24h, calculé sur une fenêtre de transferts récents
// ============================================================================

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeResult {
    /// Volume en USD (avec plancher)
    pub volume: f64,

    /// Nombre de transferts retenus dans la fenêtre de 24h
    pub transaction_count: usize,

    /// true si au moins un transfert a été trouvé
    pub is_real: bool,
}

impl VolumeResult {
    pub fn fallback(volume: f64) -> Self {
        Self {
            volume,
            transaction_count: 0,
            is_real: false,
        }
    }
}

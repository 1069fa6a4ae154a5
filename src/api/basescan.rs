// ============================================================================
// API Client : BaseScan
// ============================================================================
// Explorateur de blocs de la chaîne Base (API compatible Etherscan)
//
// Toutes les réponses ont la même enveloppe :
//   { "status": "1", "message": "OK", "result": [...] }
// status != "1" signifie "pas de données" (ou limite atteinte), et dans ce
// cas `result` est souvent une chaîne de caractères, pas un tableau.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api::get_json;
use crate::error::{StatsError, StatsResult};

/// Enveloppe commune des réponses BaseScan
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: serde_json::Value,
}

impl Envelope {
    /// Vérifie l'enveloppe et désérialise le tableau `result`
    ///
    /// CONCEPT RUST : serde_json::Value comme étape intermédiaire
    /// - On ne connaît la forme de `result` qu'après avoir lu `status`
    /// - from_value convertit ensuite vers le type attendu
    fn into_records<T: DeserializeOwned>(self) -> StatsResult<Vec<T>> {
        let message = self.message.unwrap_or_default();

        if self.status != "1" {
            return Err(StatsError::EmptyResult(format!(
                "status {} : {}",
                self.status, message
            )));
        }

        if !self.result.is_array() {
            return Err(StatsError::EmptyResult(format!(
                "result n'est pas un tableau : {}",
                message
            )));
        }

        Ok(serde_json::from_value(self.result)?)
    }
}

/// Un holder du token (seule la présence de l'enregistrement compte)
#[derive(Debug, Clone, Deserialize)]
pub struct HolderRecord {
    #[serde(rename = "TokenHolderAddress", default)]
    pub address: String,

    #[serde(rename = "TokenHolderQuantity", default)]
    pub quantity: String,
}

/// Un transfert ERC-20 du token
///
/// BaseScan renvoie tous les nombres sous forme de chaînes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    /// Timestamp Unix en secondes
    pub time_stamp: String,

    /// Montant brut dans l'unité minimale (virgule fixe à 18 décimales)
    pub value: String,

    #[serde(default)]
    pub hash: String,
}

/// Récupère une page de la liste des holders
///
/// # Arguments
/// * `base_url` - URL de l'API (ex: "https://api.basescan.org/api")
/// * `page` - numéro de page, à partir de 1
/// * `offset` - nombre d'enregistrements par page
#[instrument(skip(client, base_url))]
pub async fn fetch_holders_page(
    client: &reqwest::Client,
    base_url: &str,
    address: &str,
    page: u32,
    offset: usize,
) -> StatsResult<Vec<HolderRecord>> {
    let query = [
        ("module", "token".to_string()),
        ("action", "tokenholderlist".to_string()),
        ("contractaddress", address.to_string()),
        ("page", page.to_string()),
        ("offset", offset.to_string()),
    ];

    let envelope: Envelope = get_json(client, base_url, &query).await?;
    let records = envelope.into_records()?;
    debug!(records = records.len(), "Fetched holders page");
    Ok(records)
}

/// Récupère les transferts les plus récents (une seule page, tri décroissant)
#[instrument(skip(client, base_url))]
pub async fn fetch_token_transfers(
    client: &reqwest::Client,
    base_url: &str,
    address: &str,
    offset: usize,
) -> StatsResult<Vec<TokenTransfer>> {
    let query = [
        ("module", "account".to_string()),
        ("action", "tokentx".to_string()),
        ("contractaddress", address.to_string()),
        ("page", "1".to_string()),
        ("offset", offset.to_string()),
        ("sort", "desc".to_string()),
    ];

    let envelope: Envelope = get_json(client, base_url, &query).await?;
    let transfers = envelope.into_records()?;
    debug!(transfers = transfers.len(), "Fetched token transfers");
    Ok(transfers)
}

// ============================================================================
// Tests unitaires
// ============================================================================

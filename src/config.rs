// ============================================================================
// Module : config
// ============================================================================
// Configuration explicite de l'application
//
// Toutes les constantes (adresse du contrat, intervalle de rafraîchissement,
// valeurs de repli...) vivent dans des structures passées au constructeur
// de l'agrégateur, au lieu d'être des globales.
//
// CONCEPTS RUST :
// 1. #[serde(default)] : les champs absents du JSON prennent la valeur Default
// 2. Duration : les durées sont stockées en nombres simples (secs/ms) dans le
//    fichier, et converties en std::time::Duration via des méthodes
// ============================================================================

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Adresse du contrat du token sur Base
pub const CONTRACT_ADDRESS: &str = "0x1b7cb366859b1f09951e3267e9cf73988f9ef0be";

/// Paramètres de l'agrégateur de statistiques
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Adresse du contrat, utilisée comme clé dans toutes les requêtes
    pub contract_address: String,

    /// Intervalle entre deux cycles de rafraîchissement (secondes)
    pub refresh_interval_secs: u64,

    /// Durée maximale d'une sous-requête (holders, prix ou volume) avant
    /// repli sur sa valeur par défaut (ms)
    pub fetch_deadline_ms: u64,

    /// Durée maximale d'un cycle complet avant abandon (secondes)
    ///
    /// Doit rester au-dessus de fetch_deadline_ms : chaque sous-requête se
    /// replie seule avant que le cycle entier ne soit abandonné.
    pub cycle_deadline_secs: u64,

    /// Timeout de chaque requête HTTP (secondes)
    pub request_timeout_secs: u64,

    // === Holders ===
    /// Nombre d'enregistrements par page (offset BaseScan)
    pub holders_page_size: usize,

    /// Nombre maximum de pages récupérées
    pub holders_max_pages: u32,

    /// Délai entre deux pages, pour éviter le rate limiting (ms)
    pub holders_page_delay_ms: u64,

    /// Nombre de holders affiché quand l'API est indisponible
    pub fallback_holders: u64,

    // === Prix ===
    /// Prix de repli quand aucune source ne répond
    pub fallback_price: f64,

    /// Supply totale supposée (market cap = prix × supply)
    pub total_supply: f64,

    /// Volume de repli (USD)
    pub fallback_volume: f64,

    /// Plancher de l'estimation synthétique du volume
    pub synthetic_volume_floor: f64,

    /// Bornes du facteur aléatoire de l'estimation synthétique [min, max)
    pub synthetic_factor_min: f64,
    pub synthetic_factor_max: f64,

    // === Volume 24h ===
    /// Nombre de transferts récents demandés (une seule page)
    pub transfer_window: usize,

    /// Décimales du token (18 : unité minimale = 10^-18 token)
    pub token_decimals: u32,

    /// Prix de référence pour convertir le volume en USD
    pub volume_reference_price: f64,

    /// Plancher du volume USD
    pub min_volume_usd: f64,

    // === Sources ===
    pub basescan_url: String,
    pub dexscreener_url: String,
    pub coingecko_url: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            contract_address: CONTRACT_ADDRESS.to_string(),
            refresh_interval_secs: 30,
            fetch_deadline_ms: 15_000,
            cycle_deadline_secs: 25,
            request_timeout_secs: 10,
            holders_page_size: 100,
            holders_max_pages: 5,
            holders_page_delay_ms: 300,
            fallback_holders: 150,
            fallback_price: 0.0002,
            total_supply: 1_000_000_000.0,
            fallback_volume: 15_000.0,
            synthetic_volume_floor: 1_000.0,
            synthetic_factor_min: 0.01,
            synthetic_factor_max: 0.06,
            transfer_window: 100,
            token_decimals: 18,
            volume_reference_price: 0.0002,
            min_volume_usd: 100.0,
            basescan_url: "https://api.basescan.org/api".to_string(),
            dexscreener_url: "https://api.dexscreener.com/latest/dex/tokens".to_string(),
            coingecko_url: "https://api.coingecko.com/api/v3/simple/token_price/base".to_string(),
        }
    }
}

impl StatsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn fetch_deadline(&self) -> Duration {
        Duration::from_millis(self.fetch_deadline_ms)
    }

    pub fn cycle_deadline(&self) -> Duration {
        Duration::from_secs(self.cycle_deadline_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn holders_page_delay(&self) -> Duration {
        Duration::from_millis(self.holders_page_delay_ms)
    }
}

/// Paramètres du serveur de fichiers statiques
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Répertoire servi (la page, le CSS, les scripts, les images)
    pub root: PathBuf,

    /// Document servi pour la racine "/"
    pub index: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8081,
            root: PathBuf::from("public"),
            index: "index.html".to_string(),
        }
    }
}

impl ServerConfig {
    /// Adresse d'écoute construite à partir de host:port
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Adresse d'écoute invalide : {}:{}", self.host, self.port))
    }
}

/// Configuration complète de l'application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub stats: StatsConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Charge la configuration depuis un fichier JSON s'il existe
    ///
    /// CONCEPT RUST : Option implicite via le système de fichiers
    /// - Fichier absent : configuration par défaut (pas une erreur)
    /// - Fichier présent mais invalide : erreur avec contexte
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Échec de la lecture de {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Configuration JSON invalide dans {}", path.display()))?;

        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

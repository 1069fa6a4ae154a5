// ============================================================================
// Module : format
// ============================================================================
// Fonctions pures de formatage pour l'affichage (pas d'I/O)
//
// CONCEPT RUST : format! et la précision
// - {:.2} : 2 décimales, mais une égalité exacte est arrondie au pair
//   (format!("{:.1}", 1.25) donne "1.2"). L'affichage attend "1.3" : les
//   paliers à décimales fixes passent donc par to_fixed()
// - {:.2e} : notation exponentielle, 2 décimales de mantisse (ex: 1.23e-7)
// ============================================================================

use chrono::{DateTime, Local};

/// Libellé quand holders et volume viennent tous deux des APIs
pub const REAL_DATA_LABEL: &str = "Real Data";
pub const PARTIAL_DATA_LABEL: &str = "Partially Real";

/// Formate un prix avec une précision adaptée à son ordre de grandeur
///
/// Les tokens micro-cap ont des prix minuscules : on choisit la
/// représentation la plus lisible pour chaque palier.
///
/// # Exemples
/// - 0.0000005  -> "$5.00e-7"
/// - 0.0000087  -> "$1e-5"
/// - 0.0000114  -> "$0.000011"
/// - 0.0023     -> "$0.0023"
/// - 1.5        -> "$1.50"
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "$0.00".to_string();
    }

    if price < 0.000_001 {
        format!("${:.2e}", price)
    } else if price < 0.000_01 {
        format!("${}e-5", to_fixed(price * 100_000.0, 0))
    } else if price < 0.000_1 {
        // 6 décimales max, zéros de fin retirés
        let fixed = to_fixed(price, 6);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        format!("${}", trimmed)
    } else if price < 0.01 {
        format!("${}", to_fixed(price, 4))
    } else {
        format!("${}", to_fixed(price, 2))
    }
}

/// Formate un grand nombre avec les suffixes K, M, B
///
/// En dessous de 1000 : format en-US avec exactement 2 décimales.
pub fn format_large_number(num: f64) -> String {
    if num >= 1_000_000_000.0 {
        format!("{}B", to_fixed(num / 1_000_000_000.0, 1))
    } else if num >= 1_000_000.0 {
        format!("{}M", to_fixed(num / 1_000_000.0, 1))
    } else if num >= 1_000.0 {
        format!("{}K", to_fixed(num / 1_000.0, 1))
    } else {
        let fixed = to_fixed(num.abs(), 2);
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if num < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
    }
}

/// Entier avec séparateur de milliers en-US (ex: 12345 -> "12,345")
pub fn format_with_commas(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Texte de l'emplacement "last-updated" : heure locale et statut des données
pub fn format_last_updated(time: DateTime<Local>, is_real: bool) -> String {
    let status = if is_real { REAL_DATA_LABEL } else { PARTIAL_DATA_LABEL };
    format!("{} ({})", time.format("%-I:%M:%S %p"), status)
}

/// `digits` décimales, égalités arrondies en s'éloignant de zéro (1.25 -> "1.3")
fn to_fixed(value: f64, digits: usize) -> String {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    format!("{:.*}", digits, rounded)
}

/// Insère une virgule toutes les trois positions en partant de la droite
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_price_exponential() {
        assert_eq!(format_price(0.000_000_5), "$5.00e-7");
        assert_eq!(format_price(0.000_000_123_4), "$1.23e-7");

        // Toujours 2 décimales avant le marqueur d'exposant
        for p in [1e-9, 3.3e-8, 9.99e-7, 4.2e-7] {
            let s = format_price(p);
            let mantissa = s.trim_start_matches('$').split('e').next().unwrap();
            let decimals = mantissa.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 2, "{}", s);
        }
    }

    #[test]
    fn test_format_price_scaled_e5() {
        // Le facteur 1e5 donne une valeur < 1 : l'arrondi tombe sur 0 ou 1
        assert_eq!(format_price(0.000_003_2), "$0e-5");
        assert_eq!(format_price(0.000_008_7), "$1e-5");
    }

    #[test]
    fn test_format_price_ties_round_up() {
        assert_eq!(format_price(0.000_005), "$1e-5");
        assert_eq!(format_price(0.000_012_5), "$0.000013");
        assert_eq!(format_price(0.001_25), "$0.0013");
        assert_eq!(format_price(0.125), "$0.13");
        assert_eq!(format_price(2.5), "$2.50");
    }

    #[test]
    fn test_format_price_trimmed() {
        assert_eq!(format_price(0.000_011_41), "$0.000011");
        assert_eq!(format_price(0.000_05), "$0.00005");
    }

    #[test]
    fn test_format_price_four_and_two_decimals() {
        assert_eq!(format_price(0.0002), "$0.0002");
        assert_eq!(format_price(0.0056), "$0.0056");
        assert_eq!(format_price(0.01), "$0.01");
        assert_eq!(format_price(1.5), "$1.50");
    }

    #[test]
    fn test_format_price_zero() {
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn test_format_large_number_suffixes() {
        assert_eq!(format_large_number(2_500_000_000.0), "2.5B");
        assert_eq!(format_large_number(1_000_000_000.0), "1.0B");
        assert_eq!(format_large_number(3_400_000.0), "3.4M");
        assert_eq!(format_large_number(200_000.0), "200.0K");
        assert_eq!(format_large_number(15_000.0), "15.0K");
    }

    #[test]
    fn test_format_large_number_ties_round_up() {
        assert_eq!(format_large_number(1_250.0), "1.3K");
        assert_eq!(format_large_number(1_250_000.0), "1.3M");
        assert_eq!(format_large_number(1_250_000_000.0), "1.3B");
        assert_eq!(format_large_number(0.125), "0.13");
    }

    #[test]
    fn test_format_large_number_small() {
        assert_eq!(format_large_number(999.0), "999.00");
        assert_eq!(format_large_number(100.0), "100.00");
        assert_eq!(format_large_number(0.5), "0.50");
    }

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(7), "7");
        assert_eq!(format_with_commas(500), "500");
        assert_eq!(format_with_commas(1_234), "1,234");
        assert_eq!(format_with_commas(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_last_updated() {
        let time = Local.with_ymd_and_hms(2024, 5, 1, 15, 4, 9).unwrap();
        assert_eq!(format_last_updated(time, true), "3:04:09 PM (Real Data)");
        assert_eq!(format_last_updated(time, false), "3:04:09 PM (Partially Real)");
    }
}

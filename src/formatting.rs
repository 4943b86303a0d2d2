//! Display services handed to the projection: translations, money and URLs.

use crate::repository::CurrencyView;
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use url::Url;

/// Grid date format, e.g. `10/03/24 14:05:00`.
pub const GRID_DATE_FORMAT: &str = "%d/%m/%y %H:%M:%S";
/// Export date format, the raw database form.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_CURRENCY_FORMAT: &str = "%n %s";

#[must_use]
pub fn format_grid_date(value: NaiveDateTime) -> String {
    value.format(GRID_DATE_FORMAT).to_string()
}

pub trait Translator: Send + Sync {
    /// Translate `key` for `locale`, returning the key itself when unknown.
    fn translate(&self, key: &str, locale: &str) -> String;
}

/// Built-in catalogue covering the grid's column titles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogTranslator;

const FR_FR: &[(&str, &str)] = &[
    ("Id", "Id"),
    ("Reference", "Référence"),
    ("Creation date", "Date de création"),
    ("Invoice date", "Date de facturation"),
    ("Company", "Entreprise"),
    ("Customer name", "Nom du client"),
    ("Amount", "Montant"),
    ("Status", "Etat"),
    ("Action", "Action"),
    ("Invoice reference", "Référence de facture"),
    ("Delivery reference", "Référence de livraison"),
    ("Email", "Email"),
    (
        "Some orders could not be deleted",
        "Certaines commandes n'ont pas pu être supprimées",
    ),
];

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str, locale: &str) -> String {
        let catalogue = match locale {
            "fr_FR" | "fr" => FR_FR,
            _ => return key.to_string(),
        };
        catalogue
            .iter()
            .find(|(source, _)| *source == key)
            .map_or_else(|| key.to_string(), |(_, translated)| (*translated).to_string())
    }
}

/// Formats amounts the way the admin displays prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoneyFormatter;

impl MoneyFormatter {
    /// Round half away from zero to `decimals`, group thousands, then render
    /// the currency pattern (`%n` number, `%s` symbol, `%c` code).
    ///
    /// ```
    /// use easy_order_manager::formatting::MoneyFormatter;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Decimal::new(123_456_789, 3);
    /// assert_eq!(MoneyFormatter.format_by_currency(amount, 2, ".", " ", None), "123 456.79");
    /// ```
    #[must_use]
    pub fn format_by_currency(
        &self,
        amount: Decimal,
        decimals: u32,
        dec_point: &str,
        thousands_sep: &str,
        currency: Option<&CurrencyView>,
    ) -> String {
        let number = format_number(amount, decimals, dec_point, thousands_sep);
        match currency {
            Some(currency) => {
                let pattern = if currency.format.is_empty() {
                    DEFAULT_CURRENCY_FORMAT
                } else {
                    currency.format.as_str()
                };
                pattern
                    .replace("%n", &number)
                    .replace("%s", &currency.symbol)
                    .replace("%c", &currency.code)
            }
            None => number,
        }
    }
}

fn format_number(amount: Decimal, decimals: u32, dec_point: &str, thousands_sep: &str) -> String {
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let rendered = format!("{:.*}", decimals as usize, rounded.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));

    let mut grouped = String::with_capacity(rendered.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push_str(thousands_sep);
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}{dec_point}{fraction}")
    }
}

/// Builds absolute admin URLs from the configured base URL.
///
/// An unparsable base is logged and links fall back to root-relative paths.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Option<Url>,
}

impl UrlBuilder {
    pub fn new(base_url: &str) -> Self {
        // Without the trailing slash `join` would replace the last segment.
        let base_url = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&base_url)
            .inspect_err(|err| {
                tracing::warn!(%base_url, error = %err, "Invalid base URL, using root-relative links");
            })
            .ok();
        Self { base }
    }

    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        self.base
            .as_ref()
            .and_then(|base| base.join(path).ok())
            .map_or_else(|| format!("/{path}"), String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn euro() -> CurrencyView {
        CurrencyView {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
            format: "%n %s".to_string(),
        }
    }

    #[test]
    fn test_format_rounds_and_groups() {
        let money = MoneyFormatter;
        assert_eq!(
            money.format_by_currency(Decimal::new(12_345_675, 3), 2, ".", " ", Some(&euro())),
            "12 345.68 €"
        );
        assert_eq!(
            money.format_by_currency(Decimal::new(5, 1), 2, ".", " ", Some(&euro())),
            "0.50 €"
        );
        assert_eq!(
            money.format_by_currency(Decimal::from(1_000_000), 2, ".", " ", None),
            "1 000 000.00"
        );
    }

    #[test]
    fn test_format_negative_amount() {
        let money = MoneyFormatter;
        assert_eq!(
            money.format_by_currency(Decimal::new(-123_456, 2), 2, ".", " ", None),
            "-1 234.56"
        );
    }

    #[test]
    fn test_currency_pattern_placeholders() {
        let money = MoneyFormatter;
        let dollar = CurrencyView {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            format: "%s%n (%c)".to_string(),
        };
        assert_eq!(
            money.format_by_currency(Decimal::new(995, 2), 2, ".", " ", Some(&dollar)),
            "$9.95 (USD)"
        );
    }

    #[test]
    fn test_catalog_translator() {
        assert_eq!(CatalogTranslator.translate("Reference", "fr_FR"), "Référence");
        assert_eq!(CatalogTranslator.translate("Reference", "en_US"), "Reference");
        assert_eq!(CatalogTranslator.translate("Unknown key", "fr_FR"), "Unknown key");
    }

    #[test]
    fn test_absolute_url_joins_slashes() {
        let urls = UrlBuilder::new("http://shop.test/");
        assert_eq!(
            urls.absolute_url("admin/order/update/3"),
            "http://shop.test/admin/order/update/3"
        );
        assert_eq!(urls.absolute_url("/admin"), "http://shop.test/admin");
    }

    #[test]
    fn test_absolute_url_keeps_base_path_and_query() {
        let urls = UrlBuilder::new("https://shop.test/thelia");
        assert_eq!(
            urls.absolute_url("admin/customer/update?customer_id=7"),
            "https://shop.test/thelia/admin/customer/update?customer_id=7"
        );
    }

    #[test]
    fn test_invalid_base_falls_back_to_root_relative() {
        let urls = UrlBuilder::new("not a url");
        assert_eq!(urls.absolute_url("admin/order/update/3"), "/admin/order/update/3");
    }

    #[test]
    fn test_grid_date_format() {
        let value =
            NaiveDateTime::parse_from_str("2024-03-10 14:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(format_grid_date(value), "10/03/24 14:05:00");
    }
}

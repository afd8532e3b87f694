//! Static catalog of currencies the FlixBus search API accepts.

/// One supported currency, with an optional display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: Option<&'static str>,
}

impl Currency {
    const fn new(code: &'static str, symbol: Option<&'static str>) -> Self {
        Self { code, symbol }
    }

    /// Display symbol, or the ISO code when none is defined.
    pub fn symbol(&self) -> &'static str {
        self.symbol.unwrap_or(self.code)
    }
}

/// Every currency the report iterates over, in ISO code order.
///
/// The order is also the tie-break order for rows with equal prices.
pub const CATALOG: &[Currency] = &[
    Currency::new("AED", None),
    Currency::new("ALL", None),
    Currency::new("ARS", None),
    Currency::new("AUD", Some("A$")),
    Currency::new("BAM", Some("KM")),
    Currency::new("BGN", Some("лв")),
    Currency::new("BOB", Some("Bs")),
    Currency::new("BRL", Some("R$")),
    Currency::new("CAD", Some("C$")),
    Currency::new("CHF", None),
    Currency::new("CLP", None),
    Currency::new("CNY", Some("¥")),
    Currency::new("COP", None),
    Currency::new("CRC", Some("₡")),
    Currency::new("CZK", Some("Kč")),
    Currency::new("DKK", Some("kr.")),
    Currency::new("EUR", Some("€")),
    Currency::new("GBP", Some("£")),
    Currency::new("GTQ", Some("Q")),
    Currency::new("HKD", Some("HK$")),
    Currency::new("HNL", Some("L")),
    Currency::new("HUF", Some("Ft")),
    Currency::new("IDR", Some("Rp")),
    Currency::new("ILS", Some("₪")),
    Currency::new("INR", Some("₹")),
    Currency::new("ISK", None),
    Currency::new("JPY", Some("¥")),
    Currency::new("KRW", Some("₩")),
    Currency::new("MKD", None),
    Currency::new("MOP", None),
    Currency::new("MXN", Some("Mex$")),
    Currency::new("MYR", Some("RM")),
    Currency::new("NIO", Some("C$")),
    Currency::new("NOK", None),
    Currency::new("NZD", Some("NZ$")),
    Currency::new("PEN", Some("S/")),
    Currency::new("PHP", Some("₱")),
    Currency::new("PLN", Some("zł")),
    Currency::new("PYG", Some("₲")),
    Currency::new("QAR", None),
    Currency::new("RON", Some("lei")),
    Currency::new("RSD", None),
    Currency::new("RUB", Some("₽")),
    Currency::new("SAR", None),
    Currency::new("SEK", None),
    Currency::new("SGD", Some("S$")),
    Currency::new("THB", Some("฿")),
    Currency::new("TRY", Some("₺")),
    Currency::new("TWD", Some("NT$")),
    Currency::new("UAH", Some("₴")),
    Currency::new("USD", Some("$")),
    Currency::new("UYU", Some("$U")),
    Currency::new("VEF", None),
    Currency::new("VND", Some("₫")),
    Currency::new("ZAR", Some("R")),
];

/// Look up a catalog entry by ISO code (case-insensitive).
pub fn lookup(code: &str) -> Option<Currency> {
    CATALOG
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_sorted_and_unique() {
        for pair in CATALOG.windows(2) {
            assert!(pair[0].code < pair[1].code, "{} >= {}", pair[0].code, pair[1].code);
        }
        assert_eq!(CATALOG.len(), 55);
    }

    #[test]
    fn symbol_falls_back_to_code() {
        assert_eq!(lookup("eur").unwrap().symbol(), "€");
        assert_eq!(lookup("CHF").unwrap().symbol(), "CHF");
        assert!(lookup("XXX").is_none());
    }
}

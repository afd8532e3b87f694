//! Terminal rendering of the comparison.
//!
//! One line per currency:
//!
//! `usd  101.32% - [93.10, 95.20, 99.99, 104.00] EUR (+1.81 inc.)`

use crate::domain::{PriceRow, ReportConfig};

/// Render every row, anchored on the base currency's first price.
pub fn format_report(rows: &[PriceRow], config: &ReportConfig) -> String {
    let base_first = rows
        .iter()
        .find(|r| r.currency == config.base)
        .map(PriceRow::first_price);

    if base_first.is_none() && !rows.is_empty() {
        tracing::warn!(base = config.base.code, "base currency has no prices, percentages unavailable");
    }

    let mut out = String::new();
    for row in rows {
        out.push_str(&format_row(row, base_first, config));
        out.push('\n');
    }
    out
}

pub fn format_row(row: &PriceRow, base_first: Option<f64>, config: &ReportConfig) -> String {
    let code = if row.currency == config.base {
        row.currency.code.to_ascii_uppercase()
    } else {
        row.currency.code.to_ascii_lowercase()
    };

    let pct = match base_first {
        Some(base) if base > 0.0 => format!("{:7.2}%", 100.0 * row.first_price() / base),
        _ => format!("{:>7}%", "n/a"),
    };

    let preview: Vec<String> = row
        .prices
        .iter()
        .take(config.preview_len)
        .map(|p| format!("{p:.2}"))
        .collect();

    let extra = if row.extra_fee > 0.0 {
        format!(" ({:+.2} {})", row.extra_fee, config.fee_placement.suffix_label())
    } else {
        String::new()
    };

    format!(
        "{code} {pct} - [{}] {}{extra}",
        preview.join(", "),
        config.base_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::lookup;
    use crate::domain::FeePlacement;

    fn row(code: &str, prices: &[f64], extra_fee: f64) -> PriceRow {
        PriceRow {
            currency: lookup(code).unwrap(),
            prices: prices.to_vec(),
            extra_fee,
        }
    }

    fn config() -> ReportConfig {
        ReportConfig::for_base(lookup("EUR").unwrap())
    }

    #[test]
    fn base_row_is_upper_case_and_anchored_at_100() {
        let line = format_row(&row("EUR", &[20.0], 0.0), Some(20.0), &config());
        assert_eq!(line, "EUR  100.00% - [20.00] EUR");
    }

    #[test]
    fn other_rows_are_lower_case_with_truncated_preview() {
        let line = format_row(&row("USD", &[18.0, 19.5, 21.0, 22.25, 30.0], 0.0), Some(20.0), &config());
        assert_eq!(line, "usd   90.00% - [18.00, 19.50, 21.00, 22.25] EUR");
    }

    #[test]
    fn positive_extra_fee_is_appended() {
        let cfg = config();
        let line = format_row(&row("GBP", &[21.0], 1.234), Some(20.0), &cfg);
        assert_eq!(line, "gbp  105.00% - [21.00] EUR (+1.23 inc.)");

        let mut separate = config();
        separate.fee_placement = FeePlacement::Separate;
        let line = format_row(&row("GBP", &[21.0], 1.0), Some(20.0), &separate);
        assert!(line.ends_with("EUR (+1.00 extra)"));
    }

    #[test]
    fn symbol_suffix_and_missing_anchor() {
        let mut cfg = config();
        cfg.show_symbol = true;
        let line = format_row(&row("USD", &[10.0], 0.0), None, &cfg);
        assert_eq!(line, "usd     n/a% - [10.00] €");
    }

    #[test]
    fn report_uses_base_row_as_anchor() {
        let rows = vec![row("GBP", &[15.0], 0.0), row("EUR", &[20.0], 0.0), row("USD", &[25.0], 0.0)];
        let out = format_report(&rows, &config());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("gbp   75.00%"));
        assert!(lines[1].starts_with("EUR  100.00%"));
        assert!(lines[2].starts_with("usd  125.00%"));
    }
}

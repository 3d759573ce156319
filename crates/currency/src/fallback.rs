use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::RateTable;

/// Units of each currency per US dollar. Used whenever the live feed is
/// unavailable.
const USD_RATES: [(&str, f64); 14] = [
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 151.5),
    ("AUD", 1.52),
    ("CAD", 1.36),
    ("CHF", 0.9),
    ("CNY", 7.23),
    ("INR", 83.4),
    ("MXN", 16.9),
    ("SGD", 1.35),
    ("THB", 36.6),
    ("NZD", 1.66),
    ("KRW", 1345.0),
];

pub fn is_supported(code: &str) -> bool {
    USD_RATES.iter().any(|(candidate, _)| *candidate == code)
}

fn usd_rate(code: &str) -> Option<f64> {
    USD_RATES
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, rate)| *rate)
}

/// Static table rebased onto `base` through USD cross rates.
pub fn table(base: &str, date: NaiveDate) -> Option<RateTable> {
    let base_rate = usd_rate(base)?;
    let rates = USD_RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), round_rate(rate / base_rate)))
        .collect::<BTreeMap<_, _>>();

    Some(RateTable {
        base: base.to_string(),
        date,
        rates,
    })
}

fn round_rate(rate: f64) -> f64 {
    (rate * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebases_through_usd() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let table = table("EUR", date).unwrap();
        assert_eq!(table.rates["EUR"], 1.0);
        assert!((table.rates["USD"] - 1.0 / 0.92).abs() < 1e-5);
        assert!(super::table("XXX", date).is_none());
    }
}

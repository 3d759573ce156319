//! Currency exchange collaborator used for budget display.
//!
//! Requests mirror the exchange service contract (`rates`, `convert`,
//! `historical`). A failing or unconfigured upstream never surfaces as an
//! error: the service answers from a static table and marks the response
//! `source = fallback`.

mod fallback;
pub mod provider;

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use provider::{HttpRateProvider, RateProvider};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("`{0}` is not a valid ISO currency code")]
    InvalidCurrency(String),
    #[error("currency `{0}` is not supported")]
    UnsupportedCurrency(String),
    #[error("amount must be a finite, non-negative number")]
    InvalidAmount,
    #[error("exchange rate upstream failed: {0}")]
    Upstream(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum CurrencyRequest {
    Rates {
        #[serde(default)]
        base_currency: Option<String>,
        #[serde(default)]
        target_currencies: Option<Vec<String>>,
    },
    Convert {
        amount: f64,
        from_currency: String,
        to_currency: String,
    },
    Historical {
        #[serde(default)]
        base_currency: Option<String>,
        #[serde(default)]
        target_currencies: Option<Vec<String>>,
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub date: NaiveDate,
    pub rates: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub currency: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedMoney {
    pub currency: String,
    pub amount: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from: Money,
    pub to: ConvertedMoney,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrencyData {
    Conversion(ConversionResult),
    Rates(RateTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub source: RateSource,
    /// Milliseconds spent answering the request.
    pub request_duration: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyResponse {
    pub success: bool,
    pub data: CurrencyData,
    pub meta: ResponseMeta,
}

impl CurrencyResponse {
    pub fn is_fallback(&self) -> bool {
        self.meta.source == RateSource::Fallback
    }
}

pub struct CurrencyService<P = HttpRateProvider> {
    provider: Option<P>,
}

impl CurrencyService<HttpRateProvider> {
    /// Service that only ever answers from the static table.
    pub fn offline() -> Self {
        Self { provider: None }
    }
}

impl<P: RateProvider> CurrencyService<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn has_upstream(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn handle(&self, request: CurrencyRequest) -> Result<CurrencyResponse, CurrencyError> {
        let started = Instant::now();

        let (data, source) = match request {
            CurrencyRequest::Rates {
                base_currency,
                target_currencies,
            } => {
                let base = normalize_code(base_currency.as_deref().unwrap_or("USD"))?;
                let (table, source) = self.rates(&base, None).await?;
                let table = filter_targets(table, target_currencies.as_deref())?;
                (CurrencyData::Rates(table), source)
            }
            CurrencyRequest::Historical {
                base_currency,
                target_currencies,
                date,
            } => {
                let base = normalize_code(base_currency.as_deref().unwrap_or("USD"))?;
                let (table, source) = self.rates(&base, Some(date)).await?;
                let table = filter_targets(table, target_currencies.as_deref())?;
                (CurrencyData::Rates(table), source)
            }
            CurrencyRequest::Convert {
                amount,
                from_currency,
                to_currency,
            } => {
                let (result, source) = self.convert(amount, &from_currency, &to_currency).await?;
                (CurrencyData::Conversion(result), source)
            }
        };

        Ok(CurrencyResponse {
            success: true,
            data,
            meta: ResponseMeta {
                source,
                request_duration: started.elapsed().as_millis() as u64,
            },
        })
    }

    pub async fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<(ConversionResult, RateSource), CurrencyError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CurrencyError::InvalidAmount);
        }
        let from = normalize_code(from)?;
        let to = normalize_code(to)?;

        let (table, mut source) = self.rates(&from, None).await?;
        let rate = match table.rates.get(&to) {
            Some(rate) => *rate,
            None => {
                let fallback = fallback_table(&from, Utc::now().date_naive())?;
                source = RateSource::Fallback;
                *fallback
                    .rates
                    .get(&to)
                    .ok_or_else(|| CurrencyError::UnsupportedCurrency(to.clone()))?
            }
        };

        Ok((
            ConversionResult {
                from: Money {
                    currency: from,
                    amount,
                },
                to: ConvertedMoney {
                    currency: to,
                    amount: round_cents(amount * rate),
                    rate,
                },
                timestamp: Utc::now(),
            },
            source,
        ))
    }

    async fn rates(
        &self,
        base: &str,
        date: Option<NaiveDate>,
    ) -> Result<(RateTable, RateSource), CurrencyError> {
        let fallback_date = date.unwrap_or_else(|| Utc::now().date_naive());

        let Some(provider) = &self.provider else {
            debug!(base, "no rates upstream configured, using static table");
            return Ok((fallback_table(base, fallback_date)?, RateSource::Fallback));
        };

        let live = match date {
            Some(date) => provider.historical(base, date).await,
            None => provider.latest(base).await,
        };

        match live {
            Ok(table) => Ok((table, RateSource::Live)),
            Err(err) => {
                warn!(base, error = %err, "rates upstream failed, using static table");
                Ok((fallback_table(base, fallback_date)?, RateSource::Fallback))
            }
        }
    }
}

fn fallback_table(base: &str, date: NaiveDate) -> Result<RateTable, CurrencyError> {
    fallback::table(base, date).ok_or_else(|| CurrencyError::UnsupportedCurrency(base.to_string()))
}

fn filter_targets(table: RateTable, targets: Option<&[String]>) -> Result<RateTable, CurrencyError> {
    let Some(targets) = targets.filter(|targets| !targets.is_empty()) else {
        return Ok(table);
    };

    let mut rates = BTreeMap::new();
    for target in targets {
        let code = normalize_code(target)?;
        let rate = table
            .rates
            .get(&code)
            .copied()
            .ok_or_else(|| CurrencyError::UnsupportedCurrency(code.clone()))?;
        rates.insert(code, rate);
    }

    Ok(RateTable { rates, ..table })
}

pub fn normalize_code(code: &str) -> Result<String, CurrencyError> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(CurrencyError::InvalidCurrency(code));
    }
    Ok(code)
}

/// Whether the static table can answer for this code.
pub fn is_supported_offline(code: &str) -> bool {
    normalize_code(code)
        .map(|code| fallback::is_supported(&code))
        .unwrap_or(false)
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Formats an amount for display, e.g. `USD 1,234.50`.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{} {}{}.{:02}", currency, sign, grouped, cents % 100)
}

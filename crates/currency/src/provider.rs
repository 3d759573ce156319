use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{CurrencyError, RateTable};

/// Upstream source of exchange rates.
pub trait RateProvider: Send + Sync {
    async fn latest(&self, base: &str) -> Result<RateTable, CurrencyError>;
    async fn historical(&self, base: &str, date: NaiveDate) -> Result<RateTable, CurrencyError>;
}

#[derive(Debug, Deserialize)]
struct RatesPayload {
    base: String,
    date: NaiveDate,
    rates: std::collections::BTreeMap<String, f64>,
}

/// Client for a frankfurter-style rates API:
/// `GET {base_url}/latest?base=USD` and `GET {base_url}/{date}?base=USD`.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CurrencyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CurrencyError::Upstream(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, path: &str, base: &str) -> Result<RateTable, CurrencyError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("base", base)])
            .send()
            .await
            .map_err(|err| CurrencyError::Upstream(err.to_string()))?;

        if !response.status().is_success() {
            return Err(CurrencyError::Upstream(format!(
                "rates endpoint returned {}",
                response.status()
            )));
        }

        let payload: RatesPayload = response
            .json()
            .await
            .map_err(|err| CurrencyError::Upstream(err.to_string()))?;

        let mut rates = payload.rates;
        rates.entry(payload.base.clone()).or_insert(1.0);

        Ok(RateTable {
            base: payload.base,
            date: payload.date,
            rates,
        })
    }
}

impl RateProvider for HttpRateProvider {
    async fn latest(&self, base: &str) -> Result<RateTable, CurrencyError> {
        self.fetch("latest", base).await
    }

    async fn historical(&self, base: &str, date: NaiveDate) -> Result<RateTable, CurrencyError> {
        self.fetch(&date.format("%Y-%m-%d").to_string(), base).await
    }
}

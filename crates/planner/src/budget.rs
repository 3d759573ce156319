use serde::Serialize;
use tracing::warn;
use wayfarer_core::{BudgetEstimate, CostRange};
use wayfarer_currency::{format_amount, CurrencyService, RateProvider, RateSource};
use wayfarer_observability::AppMetrics;

/// Budget estimate rendered in the traveller's display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetDisplay {
    pub currency: String,
    pub rate: f64,
    pub per_day: String,
    pub total_min: String,
    pub total_max: String,
    pub source: RateSource,
    /// False when conversion failed and amounts stayed in the estimate's
    /// own currency.
    pub converted: bool,
}

/// Converts a synthesized estimate for display. A failed conversion keeps
/// the original currency instead of erroring.
pub async fn display_budget<P: RateProvider>(
    currency: &CurrencyService<P>,
    estimate: &BudgetEstimate,
    target: &str,
    metrics: &AppMetrics,
) -> BudgetDisplay {
    let conversion = currency.convert(1.0, &estimate.currency, target).await;

    let (code, rate, source, converted) = match conversion {
        Ok((result, source)) => (result.to.currency, result.to.rate, source, true),
        Err(err) => {
            warn!(from = %estimate.currency, to = target, error = %err, "budget conversion failed");
            (estimate.currency.clone(), 1.0, RateSource::Fallback, false)
        }
    };
    if source == RateSource::Fallback {
        metrics.inc_currency_fallback();
    }

    let total = CostRange::new(estimate.total.min * rate, estimate.total.max * rate);
    BudgetDisplay {
        per_day: format_amount(estimate.per_day * rate, &code),
        total_min: format_amount(total.min, &code),
        total_max: format_amount(total.max, &code),
        currency: code,
        rate,
        source,
        converted,
    }
}

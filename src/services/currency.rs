use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::config::AppConfig;
use crate::errors::ServiceError;

/// Wire message for a failed lookup; the cause lands in the logs instead
const LOOKUP_FAILED_MESSAGE: &str = "Exchange rate lookup failed";

/// Quotes for one currency pair as published by the rate source
#[derive(Debug, Deserialize)]
struct RateQuote {
    value_sell: f64,
}

/// Envelope returned by the rate source; sections we don't use are ignored
#[derive(Debug, Deserialize)]
struct RateEnvelope {
    blue: RateQuote,
}

/// Client for the external exchange rate API
pub struct CurrencyClient {
    client: Client,
    base_url: String,
}

impl CurrencyClient {
    /// Build a client with the configured endpoint and lookup timeout
    pub fn new(cfg: &AppConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.exchange_rate_timeout_secs))
            .build()
            .map_err(|e| {
                ServiceError::InternalError(format!(
                    "Failed to construct exchange rate client: {}",
                    e
                ))
            })?;

        Ok(Self::with_client(cfg.exchange_rate_url.clone(), client))
    }

    /// Build a client from an existing reqwest client (useful for testing)
    pub fn with_client(base_url: String, client: Client) -> Self {
        Self { client, base_url }
    }

    /// Current sell rate from the source currency into euro.
    ///
    /// Every failure mode collapses into one error kind for callers;
    /// the log line carries what actually went wrong.
    #[instrument(skip(self))]
    pub async fn fetch_sell_rate(&self) -> Result<f64, ServiceError> {
        let response = self.client.get(&self.base_url).send().await.map_err(|e| {
            error!(url = %self.base_url, error = %e, "Exchange rate request failed");
            ServiceError::ExternalServiceError(LOOKUP_FAILED_MESSAGE.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %self.base_url, %status, "Exchange rate source returned an error status");
            return Err(ServiceError::ExternalServiceError(
                LOOKUP_FAILED_MESSAGE.to_string(),
            ));
        }

        let envelope: RateEnvelope = response.json().await.map_err(|e| {
            error!(url = %self.base_url, error = %e, "Exchange rate response did not match the expected shape");
            ServiceError::ExternalServiceError(LOOKUP_FAILED_MESSAGE.to_string())
        })?;

        let rate = envelope.blue.value_sell;
        if !rate.is_finite() || rate <= 0.0 {
            error!(url = %self.base_url, rate, "Exchange rate source returned an implausible sell rate");
            return Err(ServiceError::ExternalServiceError(
                LOOKUP_FAILED_MESSAGE.to_string(),
            ));
        }

        debug!(rate, "Fetched exchange sell rate");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_the_sell_quote() {
        let body = r#"{
            "oficial": {"value_avg": 980.0, "value_sell": 990.0, "value_buy": 970.0},
            "blue": {"value_avg": 1040.0, "value_sell": 1043.5, "value_buy": 1036.5},
            "oficial_euro": {"value_avg": 1050.0, "value_sell": 1060.0, "value_buy": 1040.0},
            "blue_euro": {"value_avg": 1110.0, "value_sell": 1115.0, "value_buy": 1105.0},
            "last_update": "2024-03-01T14:02:10.000000-03:00"
        }"#;

        let envelope: RateEnvelope = serde_json::from_str(body).unwrap();
        assert!((envelope.blue.value_sell - 1043.5).abs() < f64::EPSILON);
    }

    #[test]
    fn envelope_without_the_quote_section_is_rejected() {
        let body = r#"{"oficial": {"value_sell": 990.0}}"#;
        assert!(serde_json::from_str::<RateEnvelope>(body).is_err());
    }

    #[test]
    fn envelope_with_non_numeric_rate_is_rejected() {
        let body = r#"{"blue": {"value_sell": "fast"}}"#;
        assert!(serde_json::from_str::<RateEnvelope>(body).is_err());
    }
}

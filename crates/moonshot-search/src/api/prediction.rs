//! Prediction endpoint client
//!
//! The prediction itself is computed remotely; this client only fetches the
//! result for a selected catalog entry and decodes it.

use crate::api::catalog::StockItem;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// One point of the prediction chart.
///
/// `date` is a `YYYYMMDD` string; rows arrive newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: String,
    pub close_price: f64,
    #[serde(default)]
    pub sma: Option<f64>,
    #[serde(default)]
    pub ema: Option<f64>,
    #[serde(default)]
    pub linear: Option<f64>,
}

/// Decoded prediction for one stock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Predicted trend label; absent when the service has no verdict
    #[serde(default)]
    pub trend: Option<String>,
    /// Predicted price, when the service produced one
    #[serde(default)]
    pub predicted_price: Option<f64>,
    /// Nation classifier echoed back by the service
    #[serde(default)]
    pub nation_type: Option<String>,
    /// Price history with overlay series, newest-first
    #[serde(default)]
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Prediction>,
}

/// HTTP client for the prediction endpoint
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    /// Create a client from the session configuration
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the prediction for a selected catalog entry
    pub async fn fetch(&self, stock: &StockItem) -> Result<Prediction> {
        let url = format!("{}/service/prediction", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("stockId", stock.stock_id.as_str()),
                ("nationType", stock.nation_type.as_str()),
                ("market", stock.market.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        // An empty data object still renders; missing fields degrade to
        // placeholders at the display layer.
        Ok(envelope.data.unwrap_or(Prediction {
            trend: None,
            predicted_price: None,
            nation_type: None,
            chart: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_deserialization() {
        let body = r#"{
            "data": {
                "trend": "상승",
                "predictedPrice": 71250.0,
                "nationType": "한국",
                "chart": [
                    { "date": "20250103", "closePrice": 70800.0, "sma": 70500.0, "ema": 70650.0, "linear": 70700.0 },
                    { "date": "20250102", "closePrice": 70200.0, "sma": 70100.0, "ema": 70150.0, "linear": 70300.0 }
                ]
            }
        }"#;

        let envelope: Envelope = serde_json::from_str(body).unwrap();
        let prediction = envelope.data.unwrap();
        assert_eq!(prediction.trend.as_deref(), Some("상승"));
        assert_eq!(prediction.predicted_price, Some(71250.0));
        assert_eq!(prediction.chart.len(), 2);
        assert_eq!(prediction.chart[0].date, "20250103");
        assert_eq!(prediction.chart[1].sma, Some(70100.0));
    }

    #[test]
    fn test_sparse_payload_degrades() {
        let body = r#"{ "data": { "chart": [] } }"#;
        let envelope: Envelope = serde_json::from_str(body).unwrap();
        let prediction = envelope.data.unwrap();
        assert!(prediction.trend.is_none());
        assert!(prediction.predicted_price.is_none());
        assert!(prediction.chart.is_empty());
    }

    #[test]
    fn test_missing_data_object() {
        let body = r#"{}"#;
        let envelope: Envelope = serde_json::from_str(body).unwrap();
        assert!(envelope.data.is_none());
    }
}

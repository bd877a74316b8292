//! Blocking client for a running lap time service.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use laptime_lib::{LapRecord, PredictionResult};

const PREDICT_PATH: &str = "/api/v1/predict";

/// Problem document returned by the service for refused predictions.
#[derive(Debug, Deserialize)]
struct Problem {
    kind: String,
    message: String,
    #[serde(default)]
    accepted: Option<Vec<String>>,
}

impl Problem {
    fn describe(&self) -> String {
        match &self.accepted {
            Some(accepted) if !accepted.is_empty() => format!(
                "{}: {} (accepted: {})",
                self.kind,
                self.message,
                accepted.join(", ")
            ),
            _ => format!("{}: {}", self.kind, self.message),
        }
    }
}

/// Client for `POST /api/v1/predict` on a remote service.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }

    /// Request a prediction for `record`.
    ///
    /// Problem documents are turned into errors naming the problem kind.
    pub fn predict(&self, record: &LapRecord) -> Result<PredictionResult> {
        let url = self.predict_url();
        tracing::debug!(url = %url, "requesting remote prediction");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(record)
            .send()
            .with_context(|| format!("failed to reach {}", url))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<PredictionResult>()
                .context("service returned an unreadable prediction");
        }

        let body = response.text().unwrap_or_default();
        match serde_json::from_str::<Problem>(&body) {
            Ok(problem) => Err(anyhow!("{}", problem.describe())),
            Err(_) => Err(anyhow!("service returned HTTP {}", status)),
        }
    }
}

fn user_agent() -> String {
    format!("laptime-cli/{}", env!("CARGO_PKG_VERSION"))
}

//! Lead Sink collaborator: best-effort persistence of the completed intake
//! record. Failure here never rolls back a completed payment.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{IntakeError, Result};
use crate::form::submission::SubmissionRecord;

/// Call contract of the lead-persistence collaborator.
pub trait LeadSink {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<()>;
}

#[derive(Deserialize)]
struct SinkResponse {
    result: String,
    #[serde(default)]
    error: Option<String>,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Blocking HTTP implementation posting the record as JSON.
pub struct HttpLeadSink {
    client: Client,
    url: String,
}

impl HttpLeadSink {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| IntakeError::Sink(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl LeadSink for HttpLeadSink {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<()> {
        debug!(lead_id = %record.lead_id, "submitting lead record");
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .map_err(|err| IntakeError::Sink(err.to_string()))?;

        if !response.status().is_success() {
            return Err(IntakeError::Sink(format!(
                "lead submission returned HTTP {}",
                response.status()
            )));
        }

        let body: SinkResponse = response
            .json()
            .map_err(|err| IntakeError::Sink(err.to_string()))?;
        if body.result == "success" {
            Ok(())
        } else {
            Err(IntakeError::Sink(
                body.error
                    .unwrap_or_else(|| "lead sink reported an unspecified error".into()),
            ))
        }
    }
}

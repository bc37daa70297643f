//! Payment Gateway collaborator: intent creation and confirmation against a
//! thin forwarding proxy in front of the payment processor.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{IntakeError, Result};

/// Handle returned by a successful intent creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// Call contract of the payment collaborator. The amount accompanies the
/// service type so the gateway role charges exactly the catalog price; the
/// two tables cannot drift apart.
pub trait PaymentGateway {
    fn create_intent(&mut self, service_type: &str, amount_minor_units: i64)
        -> Result<PaymentIntent>;

    fn confirm(&mut self, client_secret: &str) -> Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIntentRequest<'a> {
    service_type: &'a str,
    amount_minor_units: i64,
    currency: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIntentResponse {
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest<'a> {
    client_secret: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmResponse {
    #[serde(default)]
    error: Option<String>,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Blocking HTTP implementation of the gateway contract.
pub struct HttpPaymentGateway {
    client: Client,
    create_url: String,
    confirm_url: String,
}

impl HttpPaymentGateway {
    pub fn new(create_url: impl Into<String>, confirm_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| IntakeError::Gateway(err.to_string()))?;
        Ok(Self {
            client,
            create_url: create_url.into(),
            confirm_url: confirm_url.into(),
        })
    }
}

impl PaymentGateway for HttpPaymentGateway {
    fn create_intent(
        &mut self,
        service_type: &str,
        amount_minor_units: i64,
    ) -> Result<PaymentIntent> {
        debug!(service_type, amount_minor_units, "creating payment intent");
        let response = self
            .client
            .post(&self.create_url)
            .json(&CreateIntentRequest {
                service_type,
                amount_minor_units,
                currency: "cad",
            })
            .send()
            .map_err(|err| IntakeError::Gateway(err.to_string()))?;

        if !response.status().is_success() {
            return Err(IntakeError::Gateway(format!(
                "intent creation returned HTTP {}",
                response.status()
            )));
        }

        let body: CreateIntentResponse = response
            .json()
            .map_err(|err| IntakeError::Gateway(err.to_string()))?;
        if let Some(error) = body.error {
            warn!(error, "gateway rejected intent creation");
            return Err(IntakeError::Gateway(error));
        }
        let client_secret = body
            .client_secret
            .ok_or_else(|| IntakeError::Gateway("response carried no client secret".into()))?;
        Ok(PaymentIntent { client_secret })
    }

    fn confirm(&mut self, client_secret: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.confirm_url)
            .json(&ConfirmRequest { client_secret })
            .send()
            .map_err(|err| IntakeError::Gateway(err.to_string()))?;

        if !response.status().is_success() {
            return Err(IntakeError::Gateway(format!(
                "payment confirmation returned HTTP {}",
                response.status()
            )));
        }

        let body: ConfirmResponse = response
            .json()
            .map_err(|err| IntakeError::Gateway(err.to_string()))?;
        if let Some(error) = body.error {
            return Err(IntakeError::Gateway(error));
        }
        Ok(())
    }
}

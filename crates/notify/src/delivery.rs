//! The email delivery collaborator and its EmailJS REST implementation.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::{DeliveryFailure, EmailConfig};

/// Template variables substituted by the delivery service.
pub type TemplateParams = BTreeMap<String, String>;

/// Successful answer of the delivery service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub text: String,
}

/// Opaque "render this template and send it" service.
#[async_trait]
pub trait DeliveryService: Send + Sync {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryFailure>;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// EmailJS REST client. Creating it is the one-time `init(public_key)` step.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    http: reqwest::Client,
    public_key: String,
    api_url: String,
}

impl EmailJsClient {
    pub fn new(config: &EmailConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(4)
            .build()?;
        Ok(Self {
            http,
            public_key: config.public_key.clone(),
            api_url: config.api_url.clone(),
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

#[async_trait]
impl DeliveryService for EmailJsClient {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryFailure> {
        let body = SendRequest {
            service_id,
            template_id,
            user_id: &self.public_key,
            template_params: params,
        };

        let response = match self.http.post(&self.api_url).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "emailjs_transport_error");
                return Err(DeliveryFailure::network());
            }
        };

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        interpret_response(status, text)
    }
}

fn interpret_response(status: u16, text: String) -> Result<DeliveryReceipt, DeliveryFailure> {
    if (200..300).contains(&status) {
        Ok(DeliveryReceipt { status, text })
    } else {
        Err(DeliveryFailure::from_response(status, &text))
    }
}

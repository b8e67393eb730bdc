//! Billing REST backend client.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use super::{BillsStore, CreatedBill, FileUpload};
use crate::bills::model::{BillPayload, RawBill};

/// `BillsStore` backed by the `/bills` REST resource.
#[derive(Clone)]
pub struct ApiStore {
    http: Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Bearer token from the session, when logged in.
    jwt: Option<String>,
}

impl ApiStore {
    /// Build a client with a per-request timeout.
    pub fn new(base_url: &str, jwt: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            jwt,
        })
    }

    fn bills_url(&self) -> String {
        format!("{}/bills", self.base_url)
    }

    fn bill_url(&self, id: &str) -> String {
        format!("{}/bills/{}", self.base_url, urlencoding::encode(id))
    }

    /// Attach the bearer token if the session has one.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.jwt {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl BillsStore for ApiStore {
    async fn list(&self) -> Result<Vec<Value>> {
        let req = self.authorize(self.http.get(self.bills_url()));
        let resp = ensure_success(req.send().await?).await?;
        Ok(resp.json::<Vec<Value>>().await?)
    }

    async fn create(&self, upload: FileUpload) -> Result<CreatedBill> {
        let FileUpload { email, file } = upload;
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.name)
                    .mime_str(&file.content_type)?,
            )
            .text("email", email);

        let req = self.authorize(self.http.post(self.bills_url())).multipart(form);
        let resp = ensure_success(req.send().await?).await?;
        Ok(resp.json::<CreatedBill>().await?)
    }

    async fn update(&self, id: &str, payload: &BillPayload) -> Result<RawBill> {
        let req = self.authorize(self.http.patch(self.bill_url(id))).json(payload);
        let resp = ensure_success(req.send().await?).await?;
        Ok(resp.json::<RawBill>().await?)
    }
}

/// Convert non-2xx responses into an `Erreur <code>` error.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_else(|_| "".into());
    tracing::warn!("HTTP status {status} error: {body}");
    Err(anyhow!("Erreur {}", status.as_u16()))
}

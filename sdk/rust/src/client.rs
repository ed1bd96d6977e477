use std::collections::BTreeMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON argument: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry of the supported formatters listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportedFormatter {
    pub also_known_as: Vec<String>,
    pub supports_style_defs: bool,
    pub content_type: String,
}

/// A highlighted document and its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlighted {
    pub content_type: Option<String>,
    pub body: String,
}

pub struct HighlightClient {
    client: Client,
    base_url: String,
}

impl HighlightClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Formatters the service supports, keyed by name.
    pub async fn supported_formatters(&self) -> Result<BTreeMap<String, SupportedFormatter>, SdkError> {
        let resp = self
            .client
            .get(format!("{}/api/supported/formatters", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SdkError::Status {
                status: status.as_u16(),
                body: resp.text().await?,
            });
        }
        Ok(resp.json().await?)
    }

    /// Highlight `code` with a formatter given by name or alias.
    ///
    /// `styles` appends the formatter's style definitions when it has any;
    /// pass a selector or a list of selectors.
    pub async fn highlight(
        &self,
        formatter: &str,
        code: &str,
        lexer: Option<&str>,
        options: Option<&Value>,
        styles: Option<&Value>,
    ) -> Result<Highlighted, SdkError> {
        let mut form = vec![("code", code.to_string())];
        if let Some(lexer) = lexer {
            form.push(("lexer", lexer.to_string()));
        }
        if let Some(options) = options {
            form.push(("options", serde_json::to_string(options)?));
        }
        if let Some(styles) = styles {
            form.push(("styles", serde_json::to_string(styles)?));
        }

        let resp = self
            .client
            .post(format!("{}/api/formatter/{}", self.base_url, formatter))
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(SdkError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(Highlighted { content_type, body })
    }

    /// Post form fields to any route, returning status and body.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<(u16, String), SdkError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .form(form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        Ok((status, resp.text().await?))
    }
}

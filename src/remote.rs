use reqwest::{blocking::Client, header::HeaderMap, StatusCode};
use tracing::debug;
use url::Url;

use crate::{config::FetcherConfig, error::SubmitError, form::LetterForm};

/// The remote service's answer, kept as received.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final url after redirects.
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Delivers a letter form to the reply generator.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    fn post_form(&self, endpoint: &Url, form: &LetterForm) -> Result<RawResponse, SubmitError>;
}

/// Blocking HTTP transport. One POST per letter, no retries.
#[derive(Debug, Clone)]
pub struct HttpTransport(Client);

impl HttpTransport {
    pub fn new(config: &FetcherConfig) -> Result<Self, SubmitError> {
        Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map(Self)
            .map_err(SubmitError::Client)
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, endpoint: &Url, form: &LetterForm) -> Result<RawResponse, SubmitError> {
        let response = self
            .0
            .post(endpoint.clone())
            .form(form)
            .send()
            .map_err(|source| SubmitError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().map_err(|source| SubmitError::Body {
            endpoint: endpoint.clone(),
            source,
        })?;
        debug!(%status, bytes = body.len(), "received reply page");

        Ok(RawResponse {
            url,
            status,
            headers,
            body,
        })
    }
}

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    config::FetcherConfig,
    error::SubmitError,
    extract,
    form::LetterForm,
    letter::Letter,
    remote::{HttpTransport, RawResponse, Transport},
};

/// Santa's answer to one letter.
#[derive(Debug, Clone)]
pub struct Reply {
    raw: RawResponse,
    text: String,
}

impl Reply {
    fn from_response(raw: RawResponse, width: usize) -> Self {
        let text = extract::reply_text(&raw.body, width);
        Self { raw, text }
    }

    /// The reply letter as plain text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The response the text was extracted from.
    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Sends letters to the reply generator and extracts the replies.
///
/// Holds no state between letters, so one fetcher can serve any number of
/// letters, from any number of threads.
#[derive(Debug, Clone)]
pub struct ReplyFetcher<T = HttpTransport> {
    config: FetcherConfig,
    transport: T,
}

impl ReplyFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, SubmitError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> ReplyFetcher<T> {
    pub fn with_transport(config: FetcherConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Posts the letter and extracts the reply. Blocks until the remote service
    /// answers; every failure is returned as is.
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint, first_name = letter.first_name()))]
    pub fn fetch(&self, letter: &Letter) -> Result<Reply, SubmitError> {
        let form = LetterForm::from(letter);
        debug!("submitting letter");

        let raw = self.transport.post_form(&self.config.endpoint, &form)?;
        if !raw.status.is_success() {
            return Err(SubmitError::Status {
                endpoint: self.config.endpoint.clone(),
                status: raw.status,
            });
        }

        Ok(Reply::from_response(raw, self.config.wrap_width))
    }

    /// Fetches the replies to independent letters in parallel. Results are in the
    /// order of `letters`; one failure does not affect the others.
    pub fn fetch_all(&self, letters: &[Letter]) -> Vec<Result<Reply, SubmitError>> {
        letters.par_iter().map(|letter| self.fetch(letter)).collect()
    }
}

//! Print advice from a hosted text-generation model.
//!
//! The advisor sends a document's text to a Gemini `generateContent`
//! endpoint and returns short printing advice: a one-line summary, a
//! warning about personal data, and a colour or black-and-white
//! suggestion. It never influences merge results, and running without an
//! API key is a normal state that yields a fixed message.
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::advisory::{Advisor, AdvisoryConfig};
//! use secrecy::SecretString;
//!
//! # async fn example(text: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdvisoryConfig {
//!     api_key: Some(SecretString::from("my-key")),
//!     ..AdvisoryConfig::default()
//! };
//! let advisor = Advisor::new(config)?;
//! println!("{}", advisor.analyze(text).await);
//! # Ok(())
//! # }
//! ```

mod gemini;

use lopdf::Document;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::task;
use tracing::{debug, instrument, warn};

use crate::document::InputDocument;
use crate::error::DuplexCatError;
use gemini::{GenerateContentRequest, GenerateContentResponse};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Base URL of the hosted API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Only this many characters of a document are sent.
pub const MAX_INPUT_CHARS: usize = 10_000;

/// Returned by [`Advisor::analyze`] when no API key is configured.
pub const MISSING_KEY_MESSAGE: &str = "API key not configured. Cannot analyze.";

/// Returned by [`Advisor::analyze`] when the model produced no text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Could not analyze the content.";

/// Returned by [`Advisor::analyze`] on any other failure.
pub const REQUEST_FAILED_MESSAGE: &str = "AI request failed. Please try again later.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the advisory service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// No API key was configured.
    #[error("No API key configured for the advisory service")]
    MissingApiKey,

    /// The request could not be sent or the response not read.
    #[error("Advisory request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Advisory service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The service answered but produced no text.
    #[error("Advisory service returned no text")]
    EmptyResponse,
}

/// Settings for the advisory client.
///
/// The API key is injected here; the library never reads it from the
/// environment.
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    /// API key, `None` when advice is unavailable.
    pub api_key: Option<SecretString>,

    /// Model name.
    pub model: String,

    /// Base URL of the API, without the `/v1beta/...` path.
    pub endpoint: String,

    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for print advice.
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisoryConfig,
    client: reqwest::Client,
}

impl Advisor {
    /// Create an advisor from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::Request`] if the HTTP client cannot be built.
    pub fn new(config: AdvisoryConfig) -> Result<Self, AdvisoryError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Request advice for `text`, surfacing every failure.
    ///
    /// Only the first [`MAX_INPUT_CHARS`] characters are sent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is configured
    /// - The request fails or times out
    /// - The service answers with a non-success status
    /// - The service returns no text
    #[instrument(skip_all, fields(model = %self.config.model, chars = text.chars().count()))]
    pub async fn try_analyze(&self, text: &str) -> Result<String, AdvisoryError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(AdvisoryError::MissingApiKey)?;

        let prompt = build_prompt(truncate_chars(text, MAX_INPUT_CHARS));
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key.expose_secret())])
            .json(&GenerateContentRequest::from_prompt(&prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateContentResponse = response.json().await?;
        let advice = response.text();
        if advice.trim().is_empty() {
            return Err(AdvisoryError::EmptyResponse);
        }

        debug!(chars = advice.chars().count(), "Received advice");
        Ok(advice)
    }

    /// Request advice for `text`, mapping failures to fixed messages.
    ///
    /// Never fails; see [`MISSING_KEY_MESSAGE`], [`EMPTY_RESPONSE_MESSAGE`]
    /// and [`REQUEST_FAILED_MESSAGE`].
    pub async fn analyze(&self, text: &str) -> String {
        match self.try_analyze(text).await {
            Ok(advice) => advice,
            Err(AdvisoryError::MissingApiKey) => MISSING_KEY_MESSAGE.to_string(),
            Err(AdvisoryError::EmptyResponse) => EMPTY_RESPONSE_MESSAGE.to_string(),
            Err(err) => {
                warn!(error = %err, "Advisory request failed");
                REQUEST_FAILED_MESSAGE.to_string()
            }
        }
    }
}

/// Prompt sent to the model for `text`.
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are a printing assistant. Analyze the text below and give brief advice \
         (at most 3 bullet points) covering:\n\
         1. A one-sentence summary of the main content.\n\
         2. A warning if it contains sensitive information (phone numbers, e-mail addresses, ID numbers).\n\
         3. A printing suggestion (for example colour or black-and-white, based on the content).\n\
         \n\
         Text:\n\
         {text}"
    )
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Text content of every page, in page order.
///
/// # Errors
///
/// Returns an error if lopdf cannot decode the page contents.
pub fn document_text(doc: &Document) -> crate::Result<String> {
    let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
    if page_numbers.is_empty() {
        return Ok(String::new());
    }

    doc.extract_text(&page_numbers)
        .map_err(|e| DuplexCatError::other(format!("Failed to extract text: {e}")))
}

/// Parse an input document and extract its text on a blocking worker.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or its text decoded.
pub async fn input_text(input: &InputDocument) -> crate::Result<String> {
    let name = input.name.clone();
    let bytes = input.bytes.clone();

    task::spawn_blocking(move || {
        let doc = Document::load_mem(&bytes)
            .map_err(|e| DuplexCatError::from_load_error(&name, e))?;
        document_text(&doc)
    })
    .await
    .map_err(|e| DuplexCatError::other(format!("Text extraction task failed: {e}")))?
}

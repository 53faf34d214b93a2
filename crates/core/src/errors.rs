use thiserror::Error;

/// Unified error type for the entire bullsbears-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({endpoint}): {message}")]
    Api {
        endpoint: String,
        message: String,
    },

    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    #[error("No quote provider available for {0}")]
    NoProvider(String),

    #[error("Quote not available for {symbol}: {reason}")]
    QuoteNotAvailable { symbol: String, reason: String },

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Watchlist entry not found: {0}")]
    EntryNotFound(String),

    #[error("Watchlist entry {0} is closed")]
    EntryClosed(String),

    #[error("Pick not found: {0}")]
    PickNotFound(String),

    // ── Snapshot storage ────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),
}

impl CoreError {
    /// Transport-level failures. The fetch layer degrades these to demo data;
    /// everything else is surfaced to the caller.
    pub fn is_network(&self) -> bool {
        matches!(self, CoreError::Network(_))
    }

    /// Message suitable for an inline error panel.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Network(_) => {
                "Unable to reach the insights service. Showing demo data where available.".into()
            }
            CoreError::Api { message, .. } => message.clone(),
            CoreError::RateLimited { message } => {
                format!("Daily AI generation limit reached. {message}")
            }
            other => other.to_string(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; API keys travel in the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        if e.is_decode() {
            CoreError::Deserialization(sanitized)
        } else {
            CoreError::Network(sanitized)
        }
    }
}

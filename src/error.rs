use thiserror::Error;

/// Failure of a single request against the diagnostics server.
///
/// Actions catch these at their boundary and render the message into the
/// diagnostic log. Nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, reset mid-body, etc.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-2xx response that carried no `error` field.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// Body was not JSON at all.
    #[error("{endpoint} returned a non-JSON body: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    /// JSON body that does not match the endpoint's schema.
    #[error("Malformed response from {endpoint}: {message}")]
    Malformed {
        endpoint: &'static str,
        message: String,
    },

    // ── Application ─────────────────────────────────────────────────
    /// Well-formed body carrying an explicit `error` field.
    #[error("{message}")]
    Server {
        endpoint: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn malformed(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint,
            message: message.into(),
        }
    }

    /// Returns `true` when the server answered but the payload was unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::Decode { .. })
    }
}

/// Errors reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Json(#[from] serde_json::Error),
}

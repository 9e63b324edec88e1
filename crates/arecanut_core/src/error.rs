//! User-facing failures of a classification attempt.
//!
//! The `Display` text of every variant is what ends up on screen, so the
//! wording here is the wording the user reads.

/// Why a submission did not produce a [`crate::Prediction`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    // Configuration errors, raised before any network traffic
    #[error("API URL is not configured. Please check your environment variables.")]
    NotConfigured,

    #[error("API URL is not valid ({0}). Please check your environment variables.")]
    InvalidEndpoint(String),

    // Network/server errors
    #[error("An error occurred: {0}")]
    Transport(String),

    #[error("{}", server_message(.status, .message))]
    Server { status: u16, message: Option<String> },

    #[error("Unexpected response from the server.")]
    UnexpectedResponse,
}

impl PredictError {
    /// True for failures detected locally, without contacting the endpoint.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured | Self::InvalidEndpoint(_))
    }
}

fn server_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(m) => m.clone(),
        None => format!("An error occurred: Request failed with status code {status}"),
    }
}

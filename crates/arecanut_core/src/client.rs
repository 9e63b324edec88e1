//! One multipart POST to the classification service.

use crate::error::PredictError;
use crate::model::{Prediction, error_message, parse_prediction};
use crate::selection::SelectedFile;
use anyhow::Result;
use reqwest::Url;
use reqwest::blocking::{Client, multipart};
use std::time::Duration;

/// Something that can turn an image into a [`Prediction`].
pub trait Classify: Send + Sync {
    fn classify(&self, endpoint: &Url, file: &SelectedFile) -> Result<Prediction, PredictError>;
}

/// [`Classify`] over HTTP. No retries, and requests never time out.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    http: Client,
    upload_field: String,
}

impl HttpClassifier {
    pub fn new(upload_field: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("arecanut_core/", env!("CARGO_PKG_VERSION")))
            // The blocking client otherwise gives up after 30 s.
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self::with_client(http, upload_field))
    }

    /// Uses a preconfigured client (proxy, TLS roots, ...).
    pub fn with_client(http: Client, upload_field: impl Into<String>) -> Self {
        Self {
            http,
            upload_field: upload_field.into(),
        }
    }
}

impl Classify for HttpClassifier {
    fn classify(&self, endpoint: &Url, file: &SelectedFile) -> Result<Prediction, PredictError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(transport)?;
        let form = multipart::Form::new().part(self.upload_field.clone(), part);

        tracing::info!(%endpoint, file = %file.name, bytes = file.bytes.len(), "Uploading image");
        let response = self
            .http
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .map_err(transport)?;
        let status = response.status();
        let body = response.bytes().map_err(transport)?;

        if status.is_success() {
            let prediction = parse_prediction(&body)?;
            tracing::info!(label = %prediction.label, confidence = prediction.confidence, "Prediction received");
            Ok(prediction)
        } else {
            tracing::warn!(%status, "Classification service returned an error");
            Err(PredictError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

fn transport(err: reqwest::Error) -> PredictError {
    // Keep the whole source chain; the top-level message alone hides the cause.
    let detail = format!("{:#}", anyhow::Error::from(err));
    tracing::warn!("Request failed: {detail}");
    PredictError::Transport(detail)
}

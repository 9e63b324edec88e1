//! Core of the arecanut disease classifier client: pick an image, send it to
//! the classification service, track the attempt until it settles.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod selection;
pub mod worker;
pub mod workflow;

pub use client::{Classify, HttpClassifier};
pub use config::AppConfig;
pub use error::PredictError;
pub use model::Prediction;
pub use selection::{IMAGE_EXTENSIONS, Preview, SelectedFile, is_supported_image};
pub use worker::{Dispatcher, WorkerEvent};
pub use workflow::{Outcome, Phase, ResultPanel, Submission, View, Workflow};

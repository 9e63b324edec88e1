//! The upload/inference state machine.
//!
//! Selection is the only entry point that starts work: [`Workflow::select`]
//! hands back a [`Submission`] for the caller to dispatch, and the eventual
//! [`Outcome`] comes back through [`Workflow::settle`]. Every selection and
//! every reset bumps a generation counter; outcomes issued under an older
//! generation are dropped, so a slow response can never overwrite the
//! result of a newer selection. Previews are decoded off-thread too and
//! attached under the same generation rule.

use crate::config::AppConfig;
use crate::error::PredictError;
use crate::model::Prediction;
use crate::selection::{Preview, SelectedFile};
use crate::worker::WorkerEvent;
use reqwest::Url;

/// Where the current attempt stands. Result and error are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Succeeded(Prediction),
    Failed(PredictError),
}

/// Work the caller must perform on behalf of the workflow.
#[derive(Debug, Clone)]
pub struct Submission {
    pub generation: u64,
    pub endpoint: Url,
    pub file: SelectedFile,
}

/// The settled result of a [`Submission`].
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub generation: u64,
    pub result: Result<Prediction, PredictError>,
}

/// What the result area shows. Chosen by precedence loading > error > result > none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Empty,
    Loading,
    Error(String),
    Result { label: String, confidence: String },
}

/// Render model derived from [`Workflow`] state.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub preview: Option<&'a Preview>,
    pub panel: ResultPanel,
    /// No file is held: the drop zone replaces the card.
    pub show_picker: bool,
    pub can_reset: bool,
}

#[derive(Debug)]
pub struct Workflow {
    endpoint: Result<Url, PredictError>,
    selected: Option<SelectedFile>,
    preview: Option<Preview>,
    phase: Phase,
    generation: u64,
}

impl Workflow {
    /// Resolves the endpoint once; a configuration error is reported on the first selection.
    pub fn new(config: &AppConfig) -> Self {
        let endpoint = config.endpoint_url();
        if let Err(e) = &endpoint {
            tracing::warn!("Classification endpoint unavailable: {e}");
        }
        Self {
            endpoint,
            selected: None,
            preview: None,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.phase {
            Phase::Succeeded(p) => Some(p),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PredictError> {
        match &self.phase {
            Phase::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Handles a picker change. Returns the request to issue, if any.
    ///
    /// The previous attempt's result or error is discarded before anything else
    /// happens, and any request still in flight becomes stale.
    pub fn select(&mut self, file: Option<SelectedFile>) -> Option<Submission> {
        self.generation += 1;
        self.phase = Phase::Idle;

        let Some(file) = file else {
            tracing::debug!(generation = self.generation, "Selection cleared");
            self.selected = None;
            self.preview = None;
            return None;
        };

        // The preview for this file is attached later, see `attach_preview`.
        self.preview = None;
        self.selected = Some(file.clone());

        match &self.endpoint {
            Ok(endpoint) => {
                self.phase = Phase::Loading;
                tracing::info!(generation = self.generation, file = %file.name, "Submitting selection");
                Some(Submission {
                    generation: self.generation,
                    endpoint: endpoint.clone(),
                    file,
                })
            }
            Err(e) => {
                self.phase = Phase::Failed(e.clone());
                None
            }
        }
    }

    /// Records an outcome. Returns false when it was stale and ignored.
    pub fn settle(&mut self, outcome: Outcome) -> bool {
        if outcome.generation != self.generation || !self.is_loading() {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "Dropping stale outcome"
            );
            return false;
        }
        self.phase = match outcome.result {
            Ok(prediction) => Phase::Succeeded(prediction),
            Err(e) => {
                tracing::warn!("Classification failed: {e}");
                Phase::Failed(e)
            }
        };
        true
    }

    /// Shows a preview decoded in the background. Returns false when it belongs
    /// to a selection that has since been replaced or cleared.
    pub fn attach_preview(&mut self, generation: u64, preview: Preview) -> bool {
        if generation != self.generation || self.selected.is_none() {
            tracing::debug!(stale = generation, current = self.generation, "Dropping stale preview");
            return false;
        }
        self.preview = Some(preview);
        true
    }

    /// Routes a background event to `settle` or `attach_preview`.
    pub fn apply(&mut self, event: WorkerEvent) -> bool {
        match event {
            WorkerEvent::Settled(outcome) => self.settle(outcome),
            WorkerEvent::Preview {
                generation,
                preview,
            } => self.attach_preview(generation, preview),
        }
    }

    /// Clears everything back to the empty picker. Only acts while a result is shown.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.phase, Phase::Succeeded(_)) {
            return false;
        }
        self.generation += 1;
        self.selected = None;
        self.preview = None;
        self.phase = Phase::Idle;
        tracing::debug!(generation = self.generation, "Workflow reset");
        true
    }

    pub fn view(&self) -> View<'_> {
        let panel = match &self.phase {
            Phase::Loading => ResultPanel::Loading,
            Phase::Failed(e) => ResultPanel::Error(e.to_string()),
            Phase::Succeeded(p) => ResultPanel::Result {
                label: p.label.clone(),
                confidence: p.confidence_percent(),
            },
            Phase::Idle => ResultPanel::Empty,
        };
        View {
            preview: self.preview.as_ref(),
            panel,
            show_picker: self.selected.is_none(),
            can_reset: matches!(self.phase, Phase::Succeeded(_)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::png_bytes;

    fn configured() -> Workflow {
        Workflow::new(&AppConfig::default())
    }

    fn unconfigured() -> Workflow {
        Workflow::new(&AppConfig {
            endpoint: None,
            ..AppConfig::default()
        })
    }

    fn leaf() -> SelectedFile {
        SelectedFile::from_bytes("leaf.png", png_bytes(8, 8)).unwrap()
    }

    fn thumb() -> Preview {
        Preview {
            width: 1,
            height: 1,
            rgba: vec![40, 160, 60, 255],
        }
    }

    fn healthy() -> Prediction {
        Prediction {
            label: "healthy".into(),
            confidence: 0.8734,
        }
    }

    fn succeed(wf: &mut Workflow) -> Submission {
        let sub = wf.select(Some(leaf())).expect("submission");
        assert!(wf.settle(Outcome {
            generation: sub.generation,
            result: Ok(healthy()),
        }));
        sub
    }

    #[test]
    fn starts_idle_with_picker() {
        let wf = configured();
        let view = wf.view();
        assert!(view.show_picker);
        assert!(view.preview.is_none());
        assert_eq!(view.panel, ResultPanel::Empty);
        assert!(!view.can_reset);
    }

    #[test]
    fn selection_loads_and_submits_once() {
        let mut wf = configured();
        let sub = wf.select(Some(leaf())).expect("submission");
        assert_eq!(sub.file.name, "leaf.png");
        assert_eq!(sub.endpoint.as_str(), "http://localhost:8000/predict");
        assert_eq!(sub.generation, wf.generation());
        assert!(wf.is_loading());

        let view = wf.view();
        assert_eq!(view.panel, ResultPanel::Loading);
        assert!(view.preview.is_none());
        assert!(!view.show_picker);

        assert!(wf.attach_preview(sub.generation, thumb()));
        assert_eq!(wf.view().preview, Some(&thumb()));
        assert!(wf.is_loading());
    }

    #[test]
    fn missing_endpoint_fails_without_submission() {
        let mut wf = unconfigured();
        assert!(wf.select(Some(leaf())).is_none());
        assert_eq!(wf.error(), Some(&PredictError::NotConfigured));
        assert!(wf.prediction().is_none());
        assert!(!wf.is_loading());
        assert!(wf.selected().is_some());
        assert!(wf.attach_preview(wf.generation(), thumb()));
    }

    #[test]
    fn success_renders_label_and_percentage() {
        let mut wf = configured();
        succeed(&mut wf);
        let view = wf.view();
        assert_eq!(
            view.panel,
            ResultPanel::Result {
                label: "healthy".into(),
                confidence: "87.34%".into(),
            }
        );
        assert!(view.can_reset);
    }

    #[test]
    fn failure_renders_message_and_no_result() {
        let mut wf = configured();
        let sub = wf.select(Some(leaf())).unwrap();
        wf.settle(Outcome {
            generation: sub.generation,
            result: Err(PredictError::Server {
                status: 400,
                message: Some("bad file".into()),
            }),
        });
        assert_eq!(wf.view().panel, ResultPanel::Error("bad file".into()));
        assert!(wf.prediction().is_none());
        assert!(!wf.view().can_reset);
    }

    #[test]
    fn reset_after_success_returns_to_picker() {
        let mut wf = configured();
        succeed(&mut wf);
        assert!(wf.reset());
        assert!(wf.selected().is_none());
        assert!(wf.preview().is_none());
        assert_eq!(wf.phase(), &Phase::Idle);
        assert!(wf.view().show_picker);
    }

    #[test]
    fn reset_is_unavailable_without_result() {
        let mut wf = configured();
        wf.select(Some(leaf()));
        assert!(!wf.reset());
        assert!(wf.is_loading());
        assert!(wf.selected().is_some());
    }

    #[test]
    fn new_selection_clears_previous_result_first() {
        let mut wf = configured();
        succeed(&mut wf);
        let next = wf.select(Some(leaf())).unwrap();
        assert!(wf.prediction().is_none());
        assert!(wf.error().is_none());
        assert!(wf.is_loading());
        assert!(wf.settle(Outcome {
            generation: next.generation,
            result: Err(PredictError::UnexpectedResponse),
        }));
        assert_eq!(wf.error(), Some(&PredictError::UnexpectedResponse));
        assert!(wf.prediction().is_none());
    }

    #[test]
    fn stale_outcome_cannot_overwrite_newer_selection() {
        let mut wf = configured();
        let first = wf.select(Some(leaf())).unwrap();
        let second = wf.select(Some(leaf())).unwrap();

        assert!(!wf.settle(Outcome {
            generation: first.generation,
            result: Ok(healthy()),
        }));
        assert!(wf.is_loading());

        assert!(wf.settle(Outcome {
            generation: second.generation,
            result: Err(PredictError::Transport("connection reset".into())),
        }));
        assert!(matches!(wf.phase(), Phase::Failed(PredictError::Transport(_))));
    }

    #[test]
    fn outcome_after_reset_is_ignored() {
        let mut wf = configured();
        let sub = succeed(&mut wf);
        wf.reset();
        assert!(!wf.settle(Outcome {
            generation: sub.generation,
            result: Ok(healthy()),
        }));
        assert_eq!(wf.phase(), &Phase::Idle);
    }

    #[test]
    fn empty_selection_returns_to_idle() {
        let mut wf = configured();
        succeed(&mut wf);
        assert!(wf.select(None).is_none());
        assert!(wf.selected().is_none());
        assert!(wf.preview().is_none());
        assert_eq!(wf.phase(), &Phase::Idle);
    }

    #[test]
    fn undecodable_file_still_submits_without_preview() {
        let mut wf = configured();
        let file = SelectedFile::from_bytes("scan.jpg", b"not really a jpeg".to_vec()).unwrap();
        assert!(wf.select(Some(file)).is_some());
        assert!(wf.preview().is_none());
        assert!(!wf.view().show_picker);
    }

    #[test]
    fn preview_for_replaced_selection_is_dropped() {
        let mut wf = configured();
        let first = wf.select(Some(leaf())).unwrap();
        wf.select(Some(leaf()));
        assert!(!wf.attach_preview(first.generation, thumb()));
        assert!(wf.preview().is_none());
    }

    #[test]
    fn preview_after_clear_or_reset_is_dropped() {
        let mut wf = configured();
        wf.select(Some(leaf()));
        wf.select(None);
        assert!(!wf.attach_preview(wf.generation(), thumb()));

        let sub = succeed(&mut wf);
        wf.reset();
        assert!(!wf.apply(WorkerEvent::Preview {
            generation: sub.generation,
            preview: thumb(),
        }));
        assert!(wf.preview().is_none());
    }

    #[test]
    fn apply_routes_outcomes_to_settle() {
        let mut wf = configured();
        let sub = wf.select(Some(leaf())).unwrap();
        assert!(wf.apply(WorkerEvent::Settled(Outcome {
            generation: sub.generation,
            result: Ok(healthy()),
        })));
        assert_eq!(wf.prediction(), Some(&healthy()));
    }
}

//! Wire format of the classification service.

use crate::error::PredictError;
use serde::Deserialize;

/// The service's answer for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Conventionally in [0,1].
    pub confidence: f64,
}

impl Prediction {
    /// `confidence × 100` with two decimals, e.g. `0.8734` → `"87.34%"`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

#[derive(Deserialize)]
struct WirePrediction {
    #[serde(alias = "Class", alias = "class")]
    label: String,
    #[serde(alias = "Confidence")]
    confidence: WireNumber,
}

// Some deployments send the score as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    fn value(&self) -> Option<f64> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

/// Interprets a success-status body. Anything unusable is `UnexpectedResponse`.
pub fn parse_prediction(body: &[u8]) -> Result<Prediction, PredictError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(PredictError::UnexpectedResponse);
    }
    let wire: WirePrediction = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Unusable prediction body: {e}");
        PredictError::UnexpectedResponse
    })?;
    let confidence = wire.confidence.value().ok_or(PredictError::UnexpectedResponse)?;
    let label = wire.label.trim();
    if label.is_empty() {
        return Err(PredictError::UnexpectedResponse);
    }
    if !(0.0..=1.0).contains(&confidence) {
        tracing::warn!(confidence, "Confidence outside [0,1]");
    }
    Ok(Prediction {
        label: label.to_string(),
        confidence,
    })
}

/// The `message` field of an error body, when it is a non-empty string.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let message = value.get("message")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.8734, "87.34%")]
    #[case(1.0, "100.00%")]
    #[case(0.0, "0.00%")]
    #[case(0.5, "50.00%")]
    fn confidence_is_rendered_as_percentage(#[case] confidence: f64, #[case] expected: &str) {
        let p = Prediction {
            label: "Healthy_Leaf".into(),
            confidence,
        };
        assert_eq!(p.confidence_percent(), expected);
    }

    #[rstest]
    #[case(r#"{"Class": "Healthy_Nut", "Confidence": 0.91}"#)]
    #[case(r#"{"class": "Healthy_Nut", "confidence": 0.91}"#)]
    #[case(r#"{"label": "Healthy_Nut", "confidence": "0.91"}"#)]
    #[case(r#"{"class": "Healthy_Nut", "confidence": 0.91, "extra": true}"#)]
    fn accepts_known_result_shapes(#[case] body: &str) {
        let p = parse_prediction(body.as_bytes()).expect("valid body");
        assert_eq!(p.label, "Healthy_Nut");
        assert!((p.confidence - 0.91).abs() < 1e-9);
    }

    #[rstest]
    #[case("")]
    #[case("  \n")]
    #[case("null")]
    #[case("<html>oops</html>")]
    #[case(r#"{"error": "cannot identify image file"}"#)]
    #[case(r#"{"class": "Healthy_Nut"}"#)]
    #[case(r#"{"class": "", "confidence": 0.5}"#)]
    #[case(r#"{"class": "Healthy_Nut", "confidence": "high"}"#)]
    fn rejects_unusable_bodies(#[case] body: &str) {
        assert_eq!(
            parse_prediction(body.as_bytes()),
            Err(PredictError::UnexpectedResponse)
        );
    }

    #[test]
    fn out_of_range_confidence_is_kept() {
        let p = parse_prediction(br#"{"class": "bud borer", "confidence": 97.5}"#).unwrap();
        assert_eq!(p.confidence, 97.5);
    }

    #[rstest]
    #[case(r#"{"message": "bad file"}"#, Some("bad file"))]
    #[case(r#"{"message": ""}"#, None)]
    #[case(r#"{"message": 42}"#, None)]
    #[case(r#"{"detail": "Not Found"}"#, None)]
    #[case("Internal Server Error", None)]
    fn extracts_error_message(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(error_message(body.as_bytes()).as_deref(), expected);
    }
}

//! Inference body validation.

use super::errors::InferenceError;

/// Validate an endpoint body and return the trimmed decimal text.
///
/// The text is returned as-is rather than re-formatted from the parsed
/// float so the submitted value keeps the endpoint's precision.
pub fn parse_inference_body(body: &str) -> Result<String, InferenceError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(InferenceError::EmptyBody);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(trimmed.to_string()),
        _ => Err(InferenceError::NotNumeric(trimmed.to_string())),
    }
}

use thiserror::Error;
/// A failed poll cycle. Every variant is recorded and then swallowed.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("endpoint answered with HTTP {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Decode(String),
    #[error("chart update failed: {0}")]
    Chart(String),
}
impl From<reqwest::Error> for PollError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            PollError::Timeout
        } else if value.is_decode() {
            PollError::Decode(value.to_string())
        } else if let Some(status) = value.status() {
            PollError::Status(status.as_u16())
        } else {
            PollError::Network(value.to_string())
        }
    }
}
impl From<serde_json::Error> for PollError {
    fn from(value: serde_json::Error) -> Self {
        PollError::Decode(value.to_string())
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PollError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PollError::Chart(format!("{value:?}"))
    }
}
impl From<image::ImageError> for PollError {
    fn from(value: image::ImageError) -> Self {
        PollError::Chart(value.to_string())
    }
}

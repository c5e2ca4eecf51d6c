use chrono::{DateTime, Local};
use crate::types::LabelZone;
/// Shown on the x axis when a sample carries no usable timestamp.
pub const INVALID_LABEL: &str = "--:--:--";
const LABEL_FORMAT: &str = "%H:%M:%S";
/// Format an epoch-seconds timestamp as a wall-clock axis label.
pub fn format_label(timestamp: Option<f64>, zone: LabelZone) -> String {
    let Some(secs) = timestamp.filter(|t| t.is_finite()) else {
        return INVALID_LABEL.to_owned();
    };
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1.0e9) as u32;
    let Some(utc) = DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)) else {
        return INVALID_LABEL.to_owned();
    };
    match zone {
        LabelZone::Utc => utc.format(LABEL_FORMAT).to_string(),
        LabelZone::Local => utc.with_timezone(&Local).format(LABEL_FORMAT).to_string(),
    }
}

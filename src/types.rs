// src/types.rs
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::telemetry::PollError;

pub const CHANNEL_COUNT: usize = 5;

// 数据来源
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    #[default]
    Remote,
    Simulation,
}

// 时间标签使用的时区
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelZone {
    #[default]
    Local,
    Utc,
}

/// What to do with a sample whose timestamp is not newer than the last one kept.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Append whatever arrives, in arrival order.
    #[default]
    AcceptAll,
    /// Discard samples that are not strictly newer than the newest accepted one.
    DropStale,
}

/// The five plotted sensor series, in chart order.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Channel {
    Moisture,
    Npk,
    WaterLevel,
    Temperature,
    Humidity,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Moisture,
        Channel::Npk,
        Channel::WaterLevel,
        Channel::Temperature,
        Channel::Humidity,
    ];

    #[cfg(test)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Moisture => "Moisture",
            Channel::Npk => "NPK",
            Channel::WaterLevel => "Water Level",
            Channel::Temperature => "Temperature",
            Channel::Humidity => "Humidity",
        }
    }

    pub fn rgba(self) -> [u8; 4] {
        match self {
            Channel::Moisture => [75, 192, 192, 255],
            Channel::Npk => [54, 162, 235, 255],
            Channel::WaterLevel => [255, 206, 86, 255],
            Channel::Temperature => [255, 99, 132, 255],
            Channel::Humidity => [153, 102, 255, 255],
        }
    }
}

/// One decoded reading from the telemetry endpoint.
///
/// Every field is optional. Numbers may also arrive as numeric strings; any
/// other JSON type decodes as absent instead of failing the whole payload.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Sample {
    #[serde(default, deserialize_with = "lenient_number")]
    pub timestamp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub moisture: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub npk: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub water_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub recommendations: Option<Vec<String>>,
}

impl Sample {
    pub fn from_json(body: &str) -> Result<Self, PollError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn reading(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Moisture => self.moisture,
            Channel::Npk => self.npk,
            Channel::WaterLevel => self.water_level,
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
        }
    }

    /// Readings in chart order; absent values become NaN.
    pub fn readings(&self) -> [f64; CHANNEL_COUNT] {
        Channel::ALL.map(|ch| self.reading(ch).unwrap_or(f64::NAN))
    }

    pub fn recommendation_list(&self) -> Vec<String> {
        self.recommendations.clone().unwrap_or_default()
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        // Numeric strings such as "22.5" are coerced the way a chart would.
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|v| v.is_finite()))
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    let list = items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();
    Ok(Some(list))
}

//! The chart is an external collaborator: the window only owns its data
//! buffers. Anything that can display a [`ChartFrame`] implements
//! [`ChartSurface`], and [`ChartGuard`] makes sure it is released exactly once.
use crate::telemetry::PollError;
use crate::types::{Channel, CHANNEL_COUNT};
pub const CHART_TITLE: &str = "Sensor Overview Graph";
/// Display styling for one plotted series.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    pub rgba: [u8; 4],
    pub line_width: f32,
}
/// Static chart configuration handed to a surface when it is created.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub series: Vec<SeriesStyle>,
    pub begin_at_zero: bool,
}
impl Default for ChartConfig {
    fn default() -> Self {
        let series = Channel::ALL
            .iter()
            .map(|ch| SeriesStyle {
                label: ch.label().to_owned(),
                rgba: ch.rgba(),
                line_width: 3.0,
            })
            .collect();
        Self {
            title: CHART_TITLE.to_owned(),
            series,
            begin_at_zero: true,
        }
    }
}
/// Display buffers: x-axis labels plus one value list per series, co-indexed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartFrame {
    pub labels: Vec<String>,
    pub series: Vec<Vec<f64>>, // channel -> values
}
impl ChartFrame {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            series: vec![Vec::new(); CHANNEL_COUNT],
        }
    }
    pub fn len(&self) -> usize {
        self.labels.len()
    }
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
    /// Contiguous runs of finite points for one series, as `[index, value]`.
    /// Non-finite readings end a run, so they show up as gaps.
    pub fn segments(&self, series: usize) -> Vec<Vec<[f64; 2]>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (idx, value) in self.series.get(series).into_iter().flatten().enumerate() {
            if value.is_finite() {
                current.push([idx as f64, *value]);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
    /// Smallest and largest finite value across every series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
/// Something that can display the window: the egui plot, a PNG renderer, a
/// test double.
pub trait ChartSurface {
    /// Replace the display buffers with `frame` and redraw.
    fn update(&mut self, frame: &ChartFrame) -> Result<(), PollError>;
    /// Release rendering resources. Called once, by [`ChartGuard`].
    fn destroy(&mut self);
}
/// Owns a surface between mount and unmount; releases it on drop.
pub struct ChartGuard<C: ChartSurface> {
    surface: Option<C>,
}
impl<C: ChartSurface> ChartGuard<C> {
    pub fn acquire(surface: C) -> Self {
        Self {
            surface: Some(surface),
        }
    }
    pub fn get(&self) -> Option<&C> {
        self.surface.as_ref()
    }
    pub fn get_mut(&mut self) -> Option<&mut C> {
        self.surface.as_mut()
    }
    #[cfg(test)]
    pub fn is_released(&self) -> bool {
        self.surface.is_none()
    }
    pub fn release(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
    }
}
impl<C: ChartSurface> Drop for ChartGuard<C> {
    fn drop(&mut self) {
        self.release();
    }
}
#[cfg(test)]
pub use recording::RecordingChart;

use std::collections::VecDeque;
use crate::telemetry::chart::{ChartFrame, ChartGuard, ChartSurface};
use crate::telemetry::PollError;
#[cfg(test)]
use crate::types::Channel;
use crate::types::CHANNEL_COUNT;
pub const DEFAULT_CAPACITY: usize = 10;
/// Rolling window of labelled readings, one queue per channel.
/// All six queues always hold the same number of entries.
#[derive(Clone, Debug)]
pub struct SensorWindow {
    labels: VecDeque<String>,
    per_channel: [VecDeque<f64>; CHANNEL_COUNT], // channel -> readings
    capacity: usize,
}
impl SensorWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            labels: VecDeque::with_capacity(capacity),
            per_channel: std::array::from_fn(|_| VecDeque::with_capacity(capacity)),
            capacity,
        }
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn len(&self) -> usize {
        self.labels.len()
    }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
    #[cfg(test)]
    pub fn is_full(&self) -> bool {
        self.labels.len() == self.capacity
    }
    /// Push one labelled sample, evicting the oldest once the window is full.
    pub fn append(&mut self, label: String, readings: [f64; CHANNEL_COUNT]) {
        if self.labels.len() == self.capacity {
            self.labels.pop_front();
            for queue in &mut self.per_channel {
                queue.pop_front();
            }
        }
        self.labels.push_back(label);
        for (queue, value) in self.per_channel.iter_mut().zip(readings) {
            queue.push_back(value);
        }
    }
    #[cfg(test)]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
    #[cfg(test)]
    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = f64> + '_ {
        self.per_channel[channel.index()].iter().copied()
    }
    pub fn clear(&mut self) {
        self.labels.clear();
        for queue in &mut self.per_channel {
            queue.clear();
        }
    }
    /// Flattened copy of the current contents, ready for a chart.
    pub fn frame(&self) -> ChartFrame {
        ChartFrame {
            labels: self.labels.iter().cloned().collect(),
            series: self
                .per_channel
                .iter()
                .map(|queue| queue.iter().copied().collect())
                .collect(),
        }
    }
}
/// The window plus the chart it feeds.
pub struct WindowManager<C: ChartSurface> {
    window: SensorWindow,
    chart: ChartGuard<C>,
}
impl<C: ChartSurface> WindowManager<C> {
    pub fn new(capacity: usize, surface: C) -> Self {
        Self {
            window: SensorWindow::new(capacity),
            chart: ChartGuard::acquire(surface),
        }
    }
    pub fn window(&self) -> &SensorWindow {
        &self.window
    }
    pub fn chart(&self) -> Option<&C> {
        self.chart.get()
    }
    #[cfg(test)]
    pub fn chart_mut(&mut self) -> Option<&mut C> {
        self.chart.get_mut()
    }
    pub fn append(&mut self, label: String, readings: [f64; CHANNEL_COUNT]) {
        self.window.append(label, readings);
    }
    /// Push the current window into the chart buffers and redraw.
    /// Does not touch the window itself.
    pub fn render(&mut self) -> Result<(), PollError> {
        let Some(surface) = self.chart.get_mut() else {
            log::debug!("render skipped: chart already released");
            return Ok(());
        };
        surface.update(&self.window.frame())
    }
    pub fn clear(&mut self) {
        self.window.clear();
    }
    pub fn teardown(&mut self) {
        self.chart.release();
    }
}

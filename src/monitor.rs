// src/monitor.rs
use std::sync::Arc;

use crate::config::MonitorConfig;
use crate::telemetry::{
    format_label, ChartSurface, DiagnosticSink, RecommendationStore, SensorWindow, WindowManager,
};
use crate::types::{LabelZone, OrderingPolicy, Sample};

/// What happened to a sample handed to [`Monitor::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Appended,
    /// Appended, but the chart refused the redraw; recommendations untouched.
    RenderFailed,
    /// Dropped by [`OrderingPolicy::DropStale`].
    Stale,
    /// Arrived after teardown.
    Unmounted,
}

/// Widget state between mount and unmount: the window, its chart and the
/// recommendation list. Lives on the UI thread only.
pub struct Monitor<C: ChartSurface> {
    windows: WindowManager<C>,
    recommendations: RecommendationStore,
    ordering: OrderingPolicy,
    zone: LabelZone,
    newest_timestamp: Option<f64>,
    mounted: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl<C: ChartSurface> Monitor<C> {
    pub fn mount(config: &MonitorConfig, surface: C, sink: Arc<dyn DiagnosticSink>) -> Self {
        let mut windows = WindowManager::new(config.capacity, surface);
        if let Err(e) = windows.render() {
            sink.record(&e);
        }
        Self {
            windows,
            recommendations: RecommendationStore::new(),
            ordering: config.ordering,
            zone: config.time_zone,
            newest_timestamp: None,
            mounted: true,
            sink,
        }
    }

    /// One poll cycle's worth of work for a decoded sample.
    pub fn apply(&mut self, sample: Sample) -> Applied {
        if !self.mounted {
            log::warn!("sample {:?} arrived after teardown; ignored", sample.timestamp);
            return Applied::Unmounted;
        }
        if self.is_stale(&sample) {
            log::debug!(
                "stale sample {:?} (newest {:?}) dropped",
                sample.timestamp,
                self.newest_timestamp
            );
            return Applied::Stale;
        }
        if let Some(ts) = sample.timestamp.filter(|t| t.is_finite()) {
            self.newest_timestamp = Some(self.newest_timestamp.map_or(ts, |n| n.max(ts)));
        }

        let label = format_label(sample.timestamp, self.zone);
        self.windows.append(label, sample.readings());
        if let Err(e) = self.windows.render() {
            self.sink.record(&e);
            return Applied::RenderFailed;
        }
        self.recommendations.replace(sample.recommendation_list());
        Applied::Appended
    }

    fn is_stale(&self, sample: &Sample) -> bool {
        if self.ordering != OrderingPolicy::DropStale {
            return false;
        }
        match (sample.timestamp, self.newest_timestamp) {
            (Some(ts), Some(newest)) => ts <= newest,
            _ => false,
        }
    }

    /// Empty the window and redraw; recommendations are kept.
    pub fn reset_view(&mut self) {
        if !self.mounted {
            return;
        }
        self.windows.clear();
        self.newest_timestamp = None;
        if let Err(e) = self.windows.render() {
            self.sink.record(&e);
        }
    }

    /// Stop accepting samples and release the chart.
    pub fn unmount(&mut self) {
        if self.mounted {
            log::info!("monitor unmounted with {} sample(s) in view", self.windows.window().len());
        }
        self.mounted = false;
        self.windows.teardown();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn window(&self) -> &SensorWindow {
        self.windows.window()
    }

    pub fn chart(&self) -> Option<&C> {
        self.windows.chart()
    }

    pub fn recommendations(&self) -> &[String] {
        self.recommendations.items()
    }
}

// src/gui.rs
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use eframe::egui;
use egui::{Color32, RichText};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

use crate::config::MonitorConfig;
use crate::monitor::{Applied, Monitor};
use crate::poller::{self, PollerHandle};
use crate::telemetry::{
    render_window_png, ChartConfig, ChartFrame, ChartSurface, DiagnosticSink, HttpSource,
    LogSink, PlotStyle, PollError, SampleSource, SimulatedSource,
};
use crate::types::{Sample, SourceMode};

/// Chart buffers drawn by `egui_plot` every frame.
pub struct PlotSurface {
    config: ChartConfig,
    frame: ChartFrame,
    ctx: Option<egui::Context>,
    redraws: u64,
}

impl PlotSurface {
    pub fn new(config: ChartConfig, ctx: Option<egui::Context>) -> Self {
        Self {
            config,
            frame: ChartFrame::empty(),
            ctx,
            redraws: 0,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl ChartSurface for PlotSurface {
    fn update(&mut self, frame: &ChartFrame) -> Result<(), PollError> {
        self.frame = frame.clone();
        self.redraws += 1;
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.frame = ChartFrame::empty();
        self.ctx = None;
        log::debug!("plot surface released after {} redraw(s)", self.redraws);
    }
}

pub struct AgroVisionApp {
    config: MonitorConfig,
    source_mode: SourceMode,
    monitor: Monitor<PlotSurface>,
    poller: Option<PollerHandle>,
    rx: Option<Receiver<Sample>>,
    sink: Arc<dyn DiagnosticSink>,
    ctx: egui::Context,
    samples_seen: u64,
    log_messages: Vec<String>,
}

impl AgroVisionApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: MonitorConfig) -> Self {
        let ctx = cc.egui_ctx.clone();
        let sink: Arc<dyn DiagnosticSink> = Arc::new(LogSink);
        let surface = PlotSurface::new(ChartConfig::default(), Some(ctx.clone()));
        let monitor = Monitor::mount(&config, surface, sink.clone());
        let mut app = Self {
            source_mode: config.source,
            config,
            monitor,
            poller: None,
            rx: None,
            sink,
            ctx,
            samples_seen: 0,
            log_messages: vec!["AgroVision monitor ready.".to_owned()],
        };
        app.start_polling();
        app
    }

    fn log(&mut self, msg: impl Into<String>) {
        self.log_messages.push(format!("> {}", msg.into()));
        if self.log_messages.len() > 8 {
            self.log_messages.remove(0);
        }
    }

    fn is_polling(&self) -> bool {
        self.poller.as_ref().map_or(false, PollerHandle::is_running)
    }

    fn start_polling(&mut self) {
        if self.is_polling() {
            return;
        }
        let source: Box<dyn SampleSource> = match self.source_mode {
            SourceMode::Remote => {
                match HttpSource::new(self.config.endpoint.clone(), self.config.request_timeout()) {
                    Ok(source) => {
                        log::info!("remote source ready: {}", source.endpoint());
                        Box::new(source)
                    }
                    Err(e) => {
                        self.sink.record(&e);
                        self.log("Remote source unavailable");
                        return;
                    }
                }
            }
            SourceMode::Simulation => Box::new(SimulatedSource::new()),
        };

        // A fresh channel per run: anything still queued from an earlier run
        // is dropped with the old receiver.
        let (tx, rx) = channel();
        let ctx = self.ctx.clone();
        let handle = poller::start(
            self.config.interval(),
            source,
            move |sample| {
                if tx.send(sample).is_ok() {
                    ctx.request_repaint();
                }
            },
            self.sink.clone(),
        );
        self.poller = Some(handle);
        self.rx = Some(rx);
        let mode = match self.source_mode {
            SourceMode::Remote => "remote",
            SourceMode::Simulation => "simulation",
        };
        self.log(format!("Polling ({mode}) every {} ms", self.config.interval_ms));
    }

    fn stop_polling(&mut self) {
        if let Some(mut handle) = self.poller.take() {
            handle.stop();
            self.log("Polling stopped");
        }
        self.rx = None;
    }

    fn drain_samples(&mut self) {
        let Some(rx) = &self.rx else {
            return;
        };
        while let Ok(sample) = rx.try_recv() {
            if self.monitor.apply(sample) == Applied::Appended {
                self.samples_seen += 1;
            }
        }
    }

    fn save_snapshot(&mut self) {
        let result = match self.monitor.chart() {
            Some(surface) => {
                render_window_png(surface.frame(), surface.config(), &PlotStyle::default())
            }
            None => return,
        };
        match result {
            Ok(png) => {
                let secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                let path = format!("agrovision_snapshot_{secs}.png");
                match std::fs::write(&path, png) {
                    Ok(()) => {
                        log::info!("snapshot written to {path}");
                        self.log(format!("Saved {path}"));
                    }
                    Err(e) => {
                        log::error!("failed to write {path}: {e}");
                        self.log("Snapshot failed");
                    }
                }
            }
            Err(e) => {
                log::warn!("snapshot skipped: {e}");
                self.log("Nothing to snapshot yet");
            }
        }
    }

    fn teardown(&mut self) {
        self.stop_polling();
        if self.monitor.is_mounted() {
            self.monitor.unmount();
        }
    }

    fn draw_chart(&self, ui: &mut egui::Ui) {
        let Some(surface) = self.monitor.chart() else {
            ui.label("Chart released.");
            return;
        };
        let config = surface.config();
        let frame = surface.frame();

        ui.heading(config.title.as_str());
        let mut plot = Plot::new("sensor_overview")
            .height(self.config.chart_height)
            .legend(Legend::default().position(Corner::LeftBottom))
            .include_x(0.0)
            .include_x((self.monitor.window().capacity().max(2) - 1) as f64)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false);
        if config.begin_at_zero {
            plot = plot.include_y(0.0);
        }
        plot.show(ui, |plot_ui| {
            for (idx, style) in config.series.iter().enumerate() {
                let [r, g, b, a] = style.rgba;
                let color = Color32::from_rgba_unmultiplied(r, g, b, a);
                for run in frame.segments(idx) {
                    plot_ui.line(
                        Line::new(PlotPoints::new(run))
                            .name(&style.label)
                            .color(color)
                            .width(style.line_width),
                    );
                }
            }
        });

        ui.horizontal_wrapped(|ui| {
            for (idx, label) in frame.labels.iter().enumerate() {
                ui.label(RichText::new(format!("{idx}: {label}")).small().color(Color32::GRAY));
            }
        });
    }

    fn draw_recommendations(&self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.label(RichText::new("Recommendations").strong());
        let items = self.monitor.recommendations();
        if items.is_empty() {
            ui.label(RichText::new("No recommendations.").weak());
        }
        for rec in items {
            ui.label(RichText::new(rec).size(13.0).color(Color32::from_gray(190)));
        }
    }
}

impl eframe::App for AgroVisionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 处理后台送来的样本
        self.drain_samples();

        // 2. UI 绘制
        let mut visuals = egui::Visuals::dark();
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(10, 10, 15);
        ctx.set_visuals(visuals);

        egui::SidePanel::left("controls").min_width(240.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("AgroVision");
            ui.label("Field sensor monitor");
            ui.separator();

            let polling = self.is_polling();
            ui.add_enabled_ui(!polling, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.source_mode, SourceMode::Simulation, "SIM");
                    ui.selectable_value(&mut self.source_mode, SourceMode::Remote, "REMOTE");
                });
            });

            let btn_txt = if polling { "STOP POLLING" } else { "START POLLING" };
            if ui.button(btn_txt).clicked() {
                if polling {
                    self.stop_polling();
                } else {
                    self.start_polling();
                }
            }
            if ui.button("🔄 RESET VIEW").clicked() {
                self.monitor.reset_view();
            }
            if ui.button("💾 SAVE PNG").clicked() {
                self.save_snapshot();
            }

            ui.add_space(10.0);
            ui.label(format!(
                "In view: {}/{}",
                self.monitor.window().len(),
                self.monitor.window().capacity()
            ));
            ui.label(format!("Samples received: {}", self.samples_seen));
            if let Some(surface) = self.monitor.chart() {
                ui.label(format!("Chart redraws: {}", surface.redraws()));
            }
            if self.source_mode == SourceMode::Remote {
                ui.label(RichText::new(&self.config.endpoint).small().weak());
            }

            ui.add_space(10.0);
            ui.separator();
            egui::ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_chart(ui);
            self.draw_recommendations(ui);
        });
    }
}

impl Drop for AgroVisionApp {
    fn drop(&mut self) {
        self.teardown();
    }
}

// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod gui;
mod monitor;
mod poller;
mod telemetry;
mod types;
use anyhow::{anyhow, Result};
use config::MonitorConfig;
use eframe::egui;
// 入口函数
fn main() -> Result<()> {
    // 先读配置，日志级别取决于它
    let config_path = MonitorConfig::locate();
    let config = match &config_path {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    match &config_path {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("no config file found, using defaults"),
    }
    log::info!(
        "source {:?}, endpoint {}, every {} ms, window of {}",
        config.source,
        config.endpoint,
        config.interval_ms,
        config.capacity
    );
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 760.0])
        .with_min_inner_size([800.0, 560.0])
        .with_title("AgroVision Sensor Monitor");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "AgroVision",
        options,
        Box::new(move |cc| Box::new(gui::AgroVisionApp::new(cc, config))),
    )
    .map_err(|e| anyhow!("dashboard exited with an error: {e}"))
}

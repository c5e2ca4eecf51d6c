use crate::telemetry::PollError;
/// Where failed poll cycles are reported.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, error: &PollError);
}
/// Forwards every failure to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;
impl DiagnosticSink for LogSink {
    fn record(&self, error: &PollError) {
        log::error!("Error fetching data: {error}");
    }
}
#[cfg(test)]
pub use memory::MemorySink;

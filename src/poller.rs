// src/poller.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::telemetry::{DiagnosticSink, SampleSource};
use crate::types::Sample;

// 发给轮询线程的命令
#[derive(Clone, Copy, Debug)]
enum PollerCommand {
    Stop,
}

/// Handle to a running poller. Dropping it stops the poller.
pub struct PollerHandle {
    tx_cmd: Sender<PollerCommand>,
    stopped: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancel future ticks. A request already in flight is not aborted; its
    /// result is dropped when it lands.
    pub fn stop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            log::info!("poller stopping");
        }
        self.tx_cmd.send(PollerCommand::Stop).ok();
        // Detach: an in-flight request must not block the caller.
        self.thread.take();
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
            && self.thread.as_ref().map_or(false, |t| !t.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Poll `source` once per `interval` on a background thread.
///
/// Requests are issued one at a time from that thread, so two never overlap.
/// Ticks sit on a fixed grid measured from `start`; a request that overruns
/// one or more ticks causes them to be skipped, not replayed.
pub fn start<S, F>(
    interval: Duration,
    mut source: S,
    mut on_sample: F,
    sink: Arc<dyn DiagnosticSink>,
) -> PollerHandle
where
    S: SampleSource + 'static,
    F: FnMut(Sample) + Send + 'static,
{
    let (tx_cmd, rx_cmd) = channel();
    let stopped = Arc::new(AtomicBool::new(false));
    let stop_flag = stopped.clone();

    let thread = thread::spawn(move || {
        log::info!("poller started, interval {} ms", interval.as_millis());
        let mut next_tick = Instant::now() + interval;
        let mut cycle: u64 = 0;

        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match rx_cmd.recv_timeout(wait) {
                Ok(PollerCommand::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            cycle += 1;
            let result = source.fetch();

            if stop_flag.load(Ordering::SeqCst) {
                log::warn!("cycle {cycle} finished after stop; result discarded");
                break;
            }
            match result {
                Ok(sample) => {
                    log::debug!("cycle {cycle}: sample at {:?}", sample.timestamp);
                    on_sample(sample);
                }
                Err(e) => sink.record(&e),
            }

            next_tick += interval;
            let now = Instant::now();
            let mut skipped = 0u32;
            while next_tick <= now {
                next_tick += interval;
                skipped += 1;
            }
            if skipped > 0 {
                log::debug!("cycle {cycle} overran; skipped {skipped} tick(s)");
            }
        }
        log::info!("poller stopped after {cycle} cycle(s)");
    });

    PollerHandle {
        tx_cmd,
        stopped,
        thread: Some(thread),
    }
}

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use rand::{rngs::StdRng, Rng, SeedableRng};
use crate::telemetry::PollError;
use crate::types::Sample;
/// Anything that can produce one sample per poll cycle.
pub trait SampleSource: Send {
    fn fetch(&mut self) -> Result<Sample, PollError>;
}
impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn fetch(&mut self) -> Result<Sample, PollError> {
        (**self).fetch()
    }
}
/// Plain `GET` against a fixed URL, no query and no auth headers.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}
impl HttpSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PollError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PollError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
impl SampleSource for HttpSource {
    fn fetch(&mut self) -> Result<Sample, PollError> {
        let response = self.client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status.as_u16()));
        }
        let body = response.text()?;
        Sample::from_json(&body)
    }
}
// 模拟模式：本地随机游走，方便离线演示
const SIM_BASELINES: [f64; 5] = [42.0, 180.0, 65.0, 24.0, 55.0];
const SIM_STEP: [f64; 5] = [3.0, 12.0, 4.0, 0.6, 2.5];
/// Offline source producing a bounded random walk around plausible field values.
pub struct SimulatedSource {
    rng: StdRng,
    current: [f64; 5],
}
impl SimulatedSource {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }
    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            current: SIM_BASELINES,
        }
    }
    fn advice(&self) -> Vec<String> {
        let [moisture, npk, water_level, temperature, humidity] = self.current;
        let mut advice = Vec::new();
        if moisture < 35.0 {
            advice.push("Soil moisture is low: irrigate the field.".to_owned());
        }
        if npk < 150.0 {
            advice.push("NPK below target: apply a balanced fertiliser.".to_owned());
        }
        if water_level < 40.0 {
            advice.push("Reservoir water level is low: refill the tank.".to_owned());
        }
        if temperature > 32.0 {
            advice.push("High temperature: consider shade netting.".to_owned());
        }
        if humidity > 80.0 {
            advice.push("High humidity: watch for fungal disease.".to_owned());
        }
        advice
    }
}
impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}
impl SampleSource for SimulatedSource {
    fn fetch(&mut self) -> Result<Sample, PollError> {
        for (i, value) in self.current.iter_mut().enumerate() {
            let step = SIM_STEP[i];
            let drift = self.rng.gen_range(-step..step);
            // Pull gently back toward the baseline so the walk stays bounded.
            let pull = (SIM_BASELINES[i] - *value) * 0.1;
            *value = (*value + drift + pull).max(0.0);
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64().floor())
            .unwrap_or_default();
        let [moisture, npk, water_level, temperature, humidity] = self.current;
        Ok(Sample {
            timestamp: Some(timestamp),
            moisture: Some(moisture),
            npk: Some(npk),
            water_level: Some(water_level),
            temperature: Some(temperature),
            humidity: Some(humidity),
            recommendations: Some(self.advice()),
        })
    }
}
#[cfg(test)]
pub use manual::ManualSource;
#[cfg(test)]
mod manual {
    use std::collections::VecDeque;
    use super::SampleSource;
    use crate::telemetry::PollError;
    use crate::types::Sample;
    /// Scripted source for deterministic playback in tests.
    pub struct ManualSource {
        queue: VecDeque<Result<Sample, PollError>>,
    }
    impl ManualSource {
        pub fn new(script: impl IntoIterator<Item = Result<Sample, PollError>>) -> Self {
            Self {
                queue: script.into_iter().collect(),
            }
        }
    }
    impl SampleSource for ManualSource {
        fn fetch(&mut self) -> Result<Sample, PollError> {
            self.queue
                .pop_front()
                .unwrap_or_else(|| Err(PollError::Network("script exhausted".into())))
        }
    }
}
#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::types::Channel;

    /// Answers a single request on a loopback port with a canned response.
    fn serve_once(status: &'static str, body: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = [0u8; 2048];
            stream.read(&mut request).ok();
            thread::sleep(delay);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).ok();
        });
        format!("http://{addr}/data")
    }

    fn http_source(url: String, timeout_ms: u64) -> HttpSource {
        HttpSource::new(url, Duration::from_millis(timeout_ms)).unwrap()
    }

    #[test]
    fn http_success_decodes_body() {
        let url = serve_once(
            "200 OK",
            r#"{"timestamp":1000,"moisture":5,"recommendations":["Irrigate"]}"#,
            Duration::ZERO,
        );
        let sample = http_source(url, 2000).fetch().unwrap();
        assert_eq!(sample.timestamp, Some(1000.0));
        assert_eq!(sample.moisture, Some(5.0));
        assert_eq!(sample.npk, None);
        assert_eq!(sample.recommendation_list(), ["Irrigate"]);
    }

    #[test]
    fn http_error_status_is_a_cycle_failure() {
        let url = serve_once("503 Service Unavailable", r#"{"timestamp":1000}"#, Duration::ZERO);
        let err = http_source(url, 2000).fetch().unwrap_err();
        assert!(matches!(err, PollError::Status(503)), "{err:?}");
    }

    #[test]
    fn http_non_json_body_is_a_decode_failure() {
        let url = serve_once("200 OK", "<html>maintenance</html>", Duration::ZERO);
        let err = http_source(url, 2000).fetch().unwrap_err();
        assert!(matches!(err, PollError::Decode(_)), "{err:?}");
    }

    #[test]
    fn slow_response_is_a_timeout() {
        let url = serve_once("200 OK", r#"{"timestamp":1000}"#, Duration::from_millis(1500));
        let err = http_source(url, 200).fetch().unwrap_err();
        assert!(matches!(err, PollError::Timeout), "{err:?}");
    }
    #[test]
    fn simulated_samples_are_complete_and_non_negative() {
        let mut source = SimulatedSource::seeded(7);
        for _ in 0..50 {
            let sample = source.fetch().unwrap();
            assert!(sample.timestamp.is_some());
            assert!(sample.recommendations.is_some());
            for ch in Channel::ALL {
                let value = sample.reading(ch).unwrap();
                assert!(value.is_finite() && value >= 0.0, "{ch:?} = {value}");
            }
        }
    }
    #[test]
    fn simulated_walk_stays_near_baseline() {
        let mut source = SimulatedSource::seeded(42);
        let mut last = Sample::default();
        for _ in 0..500 {
            last = source.fetch().unwrap();
        }
        let moisture = last.moisture.unwrap();
        assert!((0.0..100.0).contains(&moisture), "moisture drifted to {moisture}");
    }
    #[test]
    fn manual_source_replays_then_fails() {
        let mut source = ManualSource::new(vec![Ok(Sample::default())]);
        assert!(source.fetch().is_ok());
        assert!(matches!(source.fetch(), Err(PollError::Network(_))));
    }
    #[test]
    fn boxed_sources_delegate() {
        let mut source: Box<dyn SampleSource> = Box::new(SimulatedSource::seeded(1));
        assert!(source.fetch().is_ok());
    }
    #[test]
    fn http_source_keeps_endpoint() {
        let source = HttpSource::new("http://127.0.0.1:9/data", Duration::from_millis(200)).unwrap();
        assert_eq!(source.endpoint(), "http://127.0.0.1:9/data");
    }
    #[test]
    fn unreachable_endpoint_is_a_cycle_failure() {
        // Port 9 (discard) is closed on test machines; the connect fails fast.
        let mut source =
            HttpSource::new("http://127.0.0.1:9/data", Duration::from_millis(500)).unwrap();
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, PollError::Network(_) | PollError::Timeout));
    }
}

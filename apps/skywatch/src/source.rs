use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use urania::{AspectDetector, ChartCalculator, ChartSnapshot, EphemerisProvider, RulerScheme};

/// Something that produces charts on demand.
#[async_trait]
pub trait Source: Send {
    fn name(&self) -> &str;

    /// Wait for the next chart. `None` means the source is exhausted.
    async fn poll(&mut self) -> Option<anyhow::Result<ChartSnapshot>>;
}

/// Where a source takes its instants from
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Same instant every poll
    Fixed(DateTime<Utc>),
    /// Wall clock at poll time
    Now,
}

impl Clock {
    fn instant(&self) -> DateTime<Utc> {
        match self {
            Clock::Fixed(at) => *at,
            Clock::Now => Utc::now(),
        }
    }
}

/// Computes a chart per poll, at most once per `interval`.
pub struct ChartSource {
    provider: Arc<dyn EphemerisProvider>,
    detector: AspectDetector,
    ruler_scheme: RulerScheme,
    clock: Clock,
    interval: Duration,
    last_poll: Option<Instant>,
    remaining: Option<usize>,
}

impl ChartSource {
    pub fn new(provider: Arc<dyn EphemerisProvider>, clock: Clock, interval: Duration) -> Self {
        Self {
            provider,
            detector: AspectDetector::new(),
            ruler_scheme: RulerScheme::default(),
            clock,
            interval,
            last_poll: None,
            remaining: None,
        }
    }

    pub fn with_detector(mut self, detector: AspectDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_ruler_scheme(mut self, scheme: RulerScheme) -> Self {
        self.ruler_scheme = scheme;
        self
    }

    /// Stop after `polls` charts
    pub fn with_limit(mut self, polls: usize) -> Self {
        self.remaining = Some(polls);
        self
    }

    /// Compute one chart off the async runtime.
    pub async fn compute(&self, instant: DateTime<Utc>) -> anyhow::Result<ChartSnapshot> {
        let provider = Arc::clone(&self.provider);
        let detector = self.detector.clone();
        let scheme = self.ruler_scheme;

        let chart = tokio::task::spawn_blocking(move || {
            ChartCalculator::new(provider.as_ref())
                .with_detector(detector)
                .with_ruler_scheme(scheme)
                .calculate(instant)
        })
        .await
        .context("chart calculation task panicked")??;
        Ok(chart)
    }
}

#[async_trait]
impl Source for ChartSource {
    fn name(&self) -> &str {
        "chart"
    }

    async fn poll(&mut self) -> Option<anyhow::Result<ChartSnapshot>> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        // Throttle
        if let Some(last) = self.last_poll {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        self.last_poll = Some(Instant::now());

        let instant = self.clock.instant();
        log::debug!("{}: computing chart for {}", self.name(), instant);
        Some(self.compute(instant).await)
    }
}

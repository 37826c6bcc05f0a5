use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use urania::ChartSnapshot;

/// Consumes computed charts.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    async fn consume(&self, chart: &ChartSnapshot) -> anyhow::Result<()>;
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// File-name timestamp, e.g. `20250514T063000Z`
pub fn file_stamp(chart: &ChartSnapshot) -> String {
    chart.instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Prints the chart record to stdout.
pub struct StdoutSink {
    pretty: bool,
}

impl StdoutSink {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

#[async_trait]
impl Sink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn consume(&self, chart: &ChartSnapshot) -> anyhow::Result<()> {
        let mut text = chart.to_json(self.pretty)?;
        text.push('\n');
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Writes one `chart_<stamp>.json` per chart into a directory.
pub struct JsonFileSink {
    dir: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            dir: dir.into(),
            pretty,
        }
    }

    pub fn path_for(&self, chart: &ChartSnapshot) -> PathBuf {
        self.dir.join(format!("chart_{}.json", file_stamp(chart)))
    }
}

#[async_trait]
impl Sink for JsonFileSink {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn consume(&self, chart: &ChartSnapshot) -> anyhow::Result<()> {
        let path = self.path_for(chart);
        let text = chart.to_json(self.pretty)?;
        write_file(&self.dir, &path, text).await
    }
}

/// Writes the twelve per-sign reports, `chart_<stamp>_<Sign>.json`.
pub struct SignReportSink {
    dir: PathBuf,
    pretty: bool,
}

impl SignReportSink {
    pub fn new(dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            dir: dir.into(),
            pretty,
        }
    }
}

#[async_trait]
impl Sink for SignReportSink {
    fn name(&self) -> &str {
        "sign_reports"
    }

    async fn consume(&self, chart: &ChartSnapshot) -> anyhow::Result<()> {
        let stamp = file_stamp(chart);
        for report in chart.sign_reports() {
            let path = self
                .dir
                .join(format!("chart_{}_{}.json", stamp, report.zodiac_sign));
            let text = to_json(&report, self.pretty)?;
            write_file(&self.dir, &path, text).await?;
        }
        Ok(())
    }
}

async fn write_file(dir: &Path, path: &Path, text: String) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output dir {:?}", dir))?;
    let len = text.len();
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    log::info!("Saved {} bytes to {:?}", len, path);
    Ok(())
}

/// Hand a chart to every sink. A failing sink does not stop the others.
pub async fn deliver(chart: &ChartSnapshot, sinks: &[Box<dyn Sink>]) -> anyhow::Result<()> {
    let mut failures = 0;
    for sink in sinks {
        if let Err(e) = sink.consume(chart).await {
            log::error!("{}: {:#}", sink.name(), e);
            failures += 1;
        }
    }
    if failures > 0 {
        anyhow::bail!("{} of {} sinks failed", failures, sinks.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use urania::{ChartCalculator, KeplerianEphemeris, ZodiacSign};

    fn chart() -> ChartSnapshot {
        let at = Utc.with_ymd_and_hms(2025, 5, 14, 6, 30, 0).unwrap();
        ChartCalculator::new(&KeplerianEphemeris::new()).calculate(at).unwrap()
    }

    #[test]
    fn test_file_stamp() {
        assert_eq!(file_stamp(&chart()), "20250514T063000Z");
    }

    #[tokio::test]
    async fn test_json_file_sink_writes_record() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path(), true);
        let chart = chart();

        sink.consume(&chart).await.unwrap();

        let path = sink.path_for(&chart);
        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["time_utc"], "2025-05-14T06:30:00.000Z");
        assert_eq!(json["positions"].as_object().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_sign_report_sink_writes_twelve_files() {
        let tmp = tempfile::tempdir().unwrap();
        // Missing output directories are created
        let dir = tmp.path().join("reports");
        let sink = SignReportSink::new(&dir, false);

        sink.consume(&chart()).await.unwrap();

        for sign in ZodiacSign::ALL {
            let path = dir.join(format!("chart_20250514T063000Z_{}.json", sign));
            let text = std::fs::read_to_string(&path).unwrap();
            let json: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(json["zodiac_sign"], sign.name());
        }
        let scorpio = std::fs::read_to_string(dir.join("chart_20250514T063000Z_Scorpio.json")).unwrap();
        assert!(scorpio.contains("\"focus_planet\":\"Mars\""));
    }

    struct FailingSink;

    #[async_trait]
    impl Sink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        async fn consume(&self, _chart: &ChartSnapshot) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[tokio::test]
    async fn test_deliver_reaches_every_sink() {
        let dir = tempfile::tempdir().unwrap();
        let sinks: Vec<Box<dyn Sink>> = vec![
            Box::new(FailingSink),
            Box::new(JsonFileSink::new(dir.path(), false)),
        ];

        let result = deliver(&chart(), &sinks).await;

        assert!(result.is_err());
        assert!(dir.path().join("chart_20250514T063000Z.json").exists());
    }
}

//! Prometheus Metrics Registry - iperf3 Throughput Gauges
//!
//! Holds one gauge per direction × stream side × field, all named
//! `iperf3_{download,upload}_{sent,received}_*`. Each probe overwrites
//! the gauges of the direction it measured; nothing is reset between
//! scrapes, so the other direction keeps its last value until it is
//! measured again.
//!
//! The registry is shared across concurrent scrapes. Gauges are set
//! field by field with no cross-field lock: two scrapes racing may
//! leave a mix of both results, and the last write per gauge wins.

use prometheus::{Encoder, Gauge, Opts, Registry, TextEncoder};
use tracing::debug;

use crate::domain::{Direction, ProbeResult};

/// The seven gauges populated from one iperf3 run.
#[derive(Debug, Clone)]
pub struct DirectionGauges {
    pub sent_bits_per_second: Gauge,
    pub sent_seconds: Gauge,
    pub sent_bytes: Gauge,
    pub sent_retransmits: Gauge,
    pub received_bits_per_second: Gauge,
    pub received_seconds: Gauge,
    pub received_bytes: Gauge,
}

impl DirectionGauges {
    fn register(registry: &Registry, direction: Direction) -> prometheus::Result<Self> {
        let gauge = |field: &str, help: &str| -> prometheus::Result<Gauge> {
            let g = Gauge::with_opts(Opts::new(
                format!("iperf3_{direction}_{field}"),
                format!("{help} ({direction})"),
            ))?;
            registry.register(Box::new(g.clone()))?;
            Ok(g)
        };

        Ok(Self {
            sent_bits_per_second: gauge("sent_bits_per_second", "Sender throughput in bits per second")?,
            sent_seconds: gauge("sent_seconds", "Sender transmit duration in seconds")?,
            sent_bytes: gauge("sent_bytes", "Bytes sent")?,
            sent_retransmits: gauge("sent_retransmits", "TCP retransmits on the sender")?,
            received_bits_per_second: gauge("received_bits_per_second", "Receiver throughput in bits per second")?,
            received_seconds: gauge("received_seconds", "Receiver duration in seconds")?,
            received_bytes: gauge("received_bytes", "Bytes received")?,
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn set(&self, result: &ProbeResult) {
        let sent = &result.end.sum_sent;
        let received = &result.end.sum_received;

        self.sent_bits_per_second.set(sent.bits_per_second);
        self.sent_bytes.set(sent.bytes);
        self.sent_seconds.set(sent.seconds);
        self.sent_retransmits.set(sent.retransmits as f64);

        self.received_bits_per_second.set(received.bits_per_second);
        self.received_bytes.set(received.bytes);
        self.received_seconds.set(received.seconds);
    }
}

/// Owned set of iperf3 gauges plus an optional process collector.
pub struct MetricsRegistry {
    /// iperf3 gauges.
    registry: Registry,
    /// Exporter process metrics, gathered only on request.
    process: Registry,
    /// Gauges written by download probes.
    pub download: DirectionGauges,
    /// Gauges written by upload probes.
    pub upload: DirectionGauges,
}

impl MetricsRegistry {
    /// Create and register all gauges, starting at zero.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let download = DirectionGauges::register(&registry, Direction::Download)?;
        let upload = DirectionGauges::register(&registry, Direction::Upload)?;

        let process = Registry::new();
        #[cfg(target_os = "linux")]
        process.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            process,
            download,
            upload,
        })
    }

    /// Overwrite the download gauges.
    pub fn record_download(&self, result: &ProbeResult) {
        self.download.set(result);
    }

    /// Overwrite the upload gauges.
    pub fn record_upload(&self, result: &ProbeResult) {
        self.upload.set(result);
    }

    /// Overwrite the gauges belonging to `direction`.
    pub fn record(&self, direction: Direction, result: &ProbeResult) {
        debug!(%direction, "recording probe result");
        match direction {
            Direction::Download => self.record_download(result),
            Direction::Upload => self.record_upload(result),
        }
    }

    /// Encode every gauge in the Prometheus text format.
    ///
    /// Reads only; calling it twice with no record in between yields the
    /// same bytes (process metrics excluded, those move on their own).
    pub fn render(&self, include_process_metrics: bool) -> prometheus::Result<Vec<u8>> {
        let mut families = self.registry.gather();
        if include_process_metrics {
            families.extend(self.process.gather());
        }

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::probe::{ProbeSummary, ReceivedStream, SentStream};

    fn result(scale: f64, retransmits: i64) -> ProbeResult {
        ProbeResult {
            end: ProbeSummary {
                sum_sent: SentStream {
                    seconds: 5.0 * scale,
                    bytes: 1000.0 * scale,
                    bits_per_second: 1600.0 * scale,
                    retransmits,
                },
                sum_received: ReceivedStream {
                    seconds: 5.5 * scale,
                    bytes: 900.0 * scale,
                    bits_per_second: 1309.0 * scale,
                },
            },
        }
    }

    fn render(m: &MetricsRegistry) -> String {
        String::from_utf8(m.render(false).unwrap()).unwrap()
    }

    #[test]
    fn test_all_gauges_registered_at_zero() {
        let m = MetricsRegistry::new().unwrap();
        let body = render(&m);

        for direction in ["download", "upload"] {
            for field in [
                "sent_bits_per_second",
                "sent_seconds",
                "sent_bytes",
                "sent_retransmits",
                "received_bits_per_second",
                "received_seconds",
                "received_bytes",
            ] {
                let line = format!("iperf3_{direction}_{field} 0\n");
                assert!(body.contains(&line), "missing {line:?} in\n{body}");
            }
        }
    }

    #[test]
    fn test_record_download_leaves_upload_untouched() {
        let m = MetricsRegistry::new().unwrap();
        m.record_download(&result(1.0, 3));
        let body = render(&m);

        assert!(body.contains("iperf3_download_sent_bits_per_second 1600\n"));
        assert!(body.contains("iperf3_download_sent_bytes 1000\n"));
        assert!(body.contains("iperf3_download_sent_seconds 5\n"));
        assert!(body.contains("iperf3_download_sent_retransmits 3\n"));
        assert!(body.contains("iperf3_download_received_bits_per_second 1309\n"));
        assert!(body.contains("iperf3_download_received_bytes 900\n"));
        assert!(body.contains("iperf3_download_received_seconds 5.5\n"));

        assert!(body.contains("iperf3_upload_sent_bits_per_second 0\n"));
        assert!(body.contains("iperf3_upload_received_bytes 0\n"));
    }

    #[test]
    fn test_record_overwrites_instead_of_accumulating() {
        let m = MetricsRegistry::new().unwrap();
        m.record(Direction::Upload, &result(1.0, 1));
        m.record(Direction::Upload, &result(2.0, 4));

        assert!((m.upload.sent_bytes.get() - 2000.0).abs() < f64::EPSILON);
        assert!((m.upload.sent_retransmits.get() - 4.0).abs() < f64::EPSILON);
        assert!(m.download.sent_bytes.get().abs() < f64::EPSILON);
    }

    #[test]
    fn test_render_is_idempotent() {
        let m = MetricsRegistry::new().unwrap();
        m.record_upload(&result(3.0, 0));

        assert_eq!(m.render(false).unwrap(), m.render(false).unwrap());
    }

    #[test]
    fn test_render_has_help_and_type() {
        let m = MetricsRegistry::new().unwrap();
        let body = render(&m);
        assert!(body.contains("# TYPE iperf3_upload_sent_bytes gauge\n"));
        assert!(body.contains("# HELP iperf3_upload_sent_bytes Bytes sent (upload)\n"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_process_metrics_only_when_requested() {
        let m = MetricsRegistry::new().unwrap();

        let without = render(&m);
        assert!(!without.contains("process_"));

        let with = String::from_utf8(m.render(true).unwrap()).unwrap();
        assert!(with.contains("process_open_fds"));
        assert!(with.contains("iperf3_download_sent_bytes"));
    }
}

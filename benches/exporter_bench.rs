//! Exporter Benchmarks - Per-Scrape Overhead Outside iperf3
//!
//! Everything a scrape does besides waiting on the child process:
//! parsing the target, decoding the report, recording and rendering.
//!
//! Run with: cargo bench --bench exporter_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use iperf3_exporter::adapters::metrics::MetricsRegistry;
use iperf3_exporter::domain::{Direction, ProbeResult, Target};

const REPORT: &[u8] = br#"{"start":{"version":"iperf 3.16"},"intervals":[],"end":{
    "sum_sent":{"start":0,"end":5,"seconds":5,"bytes":587202560,"bits_per_second":939524096,"retransmits":12,"sender":true},
    "sum_received":{"start":0,"end":5.04,"seconds":5.04,"bytes":584056832,"bits_per_second":927074336.5,"sender":true}}}"#;

/// Benchmark target parsing with an explicit port.
fn bench_parse_target(c: &mut Criterion) {
    c.bench_function("parse_target_host_port", |b| {
        b.iter(|| {
            let _t = Target::parse(black_box("iperf.example.org:5201"));
        });
    });
}

/// Benchmark decoding an iperf3 JSON report.
fn bench_decode_report(c: &mut Criterion) {
    c.bench_function("decode_iperf3_report", |b| {
        b.iter(|| {
            let _r = ProbeResult::from_json(black_box(REPORT));
        });
    });
}

/// Benchmark recording both directions and rendering the body.
fn bench_record_and_render(c: &mut Criterion) {
    let metrics = MetricsRegistry::new().expect("register gauges");
    let result = ProbeResult::from_json(REPORT).expect("sample report decodes");

    c.bench_function("record_and_render", |b| {
        b.iter(|| {
            metrics.record(Direction::Download, black_box(&result));
            metrics.record(Direction::Upload, black_box(&result));
            let _body = metrics.render(black_box(false));
        });
    });
}

criterion_group!(
    benches,
    bench_parse_target,
    bench_decode_report,
    bench_record_and_render,
);
criterion_main!(benches);

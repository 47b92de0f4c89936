//! Hot paths of the client: amount parsing, claim decoding, QR rendering
//! and gate bookkeeping.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shared_types::{MockTimeSource, Network};
use tl_02_money_codec::{parse_display_amount, to_display_unit};
use tl_04_qr_claim::{decode_claim, render_svg, ClaimOutcome, ClaimRejection, ValidationResult};
use tl_05_gate_scan::GateScanSession;

const PAYLOAD: &str = r#"{"ticketId":"0x5f2a9c","platform":"TadaaLah","network":"testnet","packageId":"0xpkg","timestamp":1733011200000}"#;

fn bench_money(c: &mut Criterion) {
    c.bench_function("parse_display_amount", |b| {
        b.iter(|| parse_display_amount(black_box("1234.567891234")))
    });
    c.bench_function("to_display_unit", |b| {
        b.iter(|| to_display_unit(black_box(1_234_567_891_234)))
    });
}

fn bench_claims(c: &mut Criterion) {
    c.bench_function("decode_claim_json", |b| b.iter(|| decode_claim(black_box(PAYLOAD))));
    c.bench_function("render_svg", |b| b.iter(|| render_svg(black_box(PAYLOAD))));
}

fn bench_gate(c: &mut Criterion) {
    c.bench_function("record_scan_full_history", |b| {
        let clock = Arc::new(MockTimeSource::new(0));
        let mut session = GateScanSession::new(clock.clone());
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            clock.advance(1);
            let result = ValidationResult {
                ticket_id: Some(format!("0x{:x}", n % 64)),
                scanned_at: n,
                network: Network::Testnet,
                outcome: ClaimOutcome::Rejected(ClaimRejection::NotFound {
                    ticket_id: "0x0".to_string(),
                }),
            };
            black_box(session.record_scan(result));
        })
    });
}

criterion_group!(benches, bench_money, bench_claims, bench_gate);
criterion_main!(benches);

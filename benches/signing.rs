//! Benchmarks for message schema lookup and EIP-712 digest computation.
//!
//! Run with: `cargo bench --bench signing`

use chrono::DateTime;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

use snapshot_core::signing::{get_types, signing_hash, MessageType, DOMAIN};
use snapshot_core::types::{MessageEnvelope, Proposal, Vote};

/// Build a proposal envelope with `choices` options.
fn proposal_envelope(choices: usize) -> serde_json::Value {
    let proposal = Proposal::new(
        "Benchmark proposal",
        "x".repeat(2_000),
        (0..choices).map(|i| format!("Option {}", i)).collect(),
        1_700_000_000,
        1_700_600_000,
        18_500_000,
    )
    .with_metadata(json!({"network": "1", "strategies": [{"name": "erc20-balance-of"}]}));

    let envelope = MessageEnvelope::at(
        "bench.eth",
        MessageType::Proposal,
        serde_json::to_value(proposal.to_payload().unwrap()).unwrap(),
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    );
    serde_json::to_value(envelope).unwrap()
}

/// Benchmark schema lookup for every message type.
fn bench_get_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_types");

    for message_type in MessageType::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(message_type),
            &message_type.as_str(),
            |b, name| b.iter(|| black_box(get_types(black_box(name)).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark the signing digest of a vote.
fn bench_vote_digest(c: &mut Criterion) {
    let types = get_types("vote").unwrap();
    let envelope = serde_json::to_value(MessageEnvelope::at(
        "bench.eth",
        MessageType::Vote,
        serde_json::to_value(Vote::new("0x1", 2).to_payload().unwrap()).unwrap(),
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    ))
    .unwrap();

    c.bench_function("vote_digest", |b| {
        b.iter(|| black_box(signing_hash(&DOMAIN, black_box(&types), black_box(&envelope)).unwrap()))
    });
}

/// Benchmark proposal digests as the number of choices grows.
fn bench_proposal_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("proposal_digest");
    let types = get_types("proposal").unwrap();

    for choices in [2, 10, 50, 200].iter() {
        let envelope = proposal_envelope(*choices);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("choices", choices), &envelope, |b, envelope| {
            b.iter(|| black_box(signing_hash(&DOMAIN, &types, black_box(envelope)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get_types, bench_vote_digest, bench_proposal_digest);
criterion_main!(benches);

//! Wire codec benchmarks

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rpclink::protocol::{OpCode, encode, read_frame};
use serde_json::{Value, json};

fn create_test_payloads() -> Vec<(&'static str, Value)> {
    vec![
        (
            "handshake",
            json!({"v": 1, "client_id": "1024012350000000000"}),
        ),
        (
            "set_activity",
            json!({
                "cmd": "SET_ACTIVITY",
                "args": {
                    "pid": 4242,
                    "activity": {
                        "details": "In a match",
                        "state": "Ranked",
                        "timestamps": {"start": 1700000000},
                        "assets": {"large_image": "map_dust", "large_text": "Dust II"},
                        "party": {"id": "p1", "size": [2, 5]},
                        "secrets": {"join": "j", "match": "m"},
                    },
                },
                "nonce": "b7e3e6a0-93f4-4ab4-9d2c-8f6a1c2d3e4f",
            }),
        ),
        (
            "ready_event",
            json!({
                "evt": "READY",
                "data": {
                    "user": {"id": "1", "username": "a", "discriminator": "0", "avatar": null}
                },
            }),
        ),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, payload) in create_test_payloads() {
        let size = serde_json::to_vec(&payload).unwrap().len() as u64;
        group.throughput(Throughput::Bytes(size));
        group.bench_function(name, |b| {
            b.iter(|| encode(OpCode::Message, &payload).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("decode");
    for (name, payload) in create_test_payloads() {
        let frame = encode(OpCode::Message, &payload).unwrap();
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                rt.block_on(async { read_frame(&mut &frame[..]).await.unwrap().unwrap() })
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);

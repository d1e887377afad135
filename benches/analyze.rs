//! Analyzer and scorer cost per call.
//!
//! Live previews re-run the analyzer on every keystroke, so `analyze` has to
//! stay well under a frame.
//!
//! ```bash
//! cargo bench --bench analyze
//! ```

use aionos::signals::BundleMap;
use aionos::{AnswerMap, Engine, Slot};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const SHORT: &str = "I will close 3 deals worth $40k in 6 weeks.";
const LONG: &str = "They don't understand my pricing and people keep undercutting me. \
    They copy whatever we launch, they sell it to the same buyers for less, and people \
    believe them because others in the market repeat what they say about us to anyone \
    who will listen. Maybe it gets better eventually, but honestly I was never sure.";

fn benchmark_analyze(c: &mut Criterion) {
    let engine = Engine::default();
    let mut group = c.benchmark_group("analyze");

    for (name, text) in [("short", SHORT), ("long", LONG)] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(name, |b| b.iter(|| engine.analyze(black_box(text))));
    }
    group.finish();
}

fn benchmark_score(c: &mut Criterion) {
    let engine = Engine::default();
    let answers: AnswerMap = Slot::ALL
        .iter()
        .map(|slot| (*slot, LONG.to_string()))
        .collect();
    let bundles: BundleMap = answers
        .iter()
        .map(|(slot, text)| (*slot, engine.analyze(text)))
        .collect();

    c.bench_function("score_categories", |b| {
        b.iter(|| engine.score_categories(black_box(&answers), black_box(&bundles)))
    });
}

criterion_group!(benches, benchmark_analyze, benchmark_score);
criterion_main!(benches);

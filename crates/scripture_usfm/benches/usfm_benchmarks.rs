//! Benchmarks for tokenizing, parsing and updating USFM.
//!
//! Run with: `cargo bench --package scripture_usfm`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use scripture_usfm::{
    EventRecorder, UpdateUsfmConfig, UsfmTokenizer, detokenize, parse_usfm, update_usfm,
};

/// A synthetic book with headings, poetry, notes and character styles.
fn sample_book(chapters: u32) -> String {
    let mut usfm = String::from("\\id MAT - Benchmark\n\\h Matthew\n\\mt1 Matthew\n");
    for chapter in 1..=chapters {
        usfm.push_str(&format!("\\c {chapter}\n\\s Heading {chapter}\n\\p\n"));
        for verse in 1..=30 {
            usfm.push_str(&format!(
                "\\v {verse} In the beginning was the \\nd Word\\nd*, and the Word was with God\
                 \\f + \\fr {chapter}:{verse} \\ft A note.\\f*\n"
            ));
            if verse % 10 == 0 {
                usfm.push_str("\\q1 A line of poetry\n\\q2 and its echo\n\\p\n");
            }
        }
    }
    usfm
}

// =============================================================================
// Tokenizer
// =============================================================================

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");
    let tokenizer = UsfmTokenizer::default();

    for chapters in [1u32, 10, 28] {
        let usfm = sample_book(chapters);
        group.throughput(Throughput::Bytes(usfm.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", chapters), &usfm, |b, usfm| {
            b.iter(|| black_box(tokenizer.tokenize(usfm)))
        });

        let tokens = tokenizer.tokenize(&usfm);
        group.bench_with_input(BenchmarkId::new("detokenize", chapters), &tokens, |b, tokens| {
            b.iter(|| black_box(detokenize(tokens)))
        });
    }

    group.finish();
}

// =============================================================================
// Parser
// =============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for chapters in [1u32, 10, 28] {
        let usfm = sample_book(chapters);
        group.throughput(Throughput::Bytes(usfm.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", chapters), &usfm, |b, usfm| {
            b.iter(|| {
                let mut recorder = EventRecorder::default();
                parse_usfm(usfm, &mut recorder, None, None);
                black_box(recorder.events.len())
            })
        });
    }

    group.finish();
}

// =============================================================================
// Updater
// =============================================================================

fn bench_updater(c: &mut Criterion) {
    let mut group = c.benchmark_group("updater");
    let usfm = sample_book(10);

    group.bench_function("no_rows", |b| {
        b.iter(|| {
            black_box(update_usfm(
                &usfm,
                Vec::new(),
                UpdateUsfmConfig::default(),
                None,
                None,
            ))
        })
    });

    group.bench_function("strip_all_text", |b| {
        let config = UpdateUsfmConfig::default().with_strip_all_text(true);
        b.iter(|| black_box(update_usfm(&usfm, Vec::new(), config.clone(), None, None)))
    });

    group.finish();
}

criterion_group!(benches, bench_tokenizer, bench_parser, bench_updater);
criterion_main!(benches);

//! Benchmarks for reference parsing and versification mapping.
//!
//! Run with: `cargo bench --package scripture_versification`

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use scripture_versification::{ScriptureRef, VerseRef, Versification, VersificationType};

// =============================================================================
// Reference Parsing
// =============================================================================

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for text in ["MAT 1:1", "MAT 1:4b-5a", "PSA 119:1-10,12"] {
        group.bench_with_input(BenchmarkId::new("verse_ref", text), &text, |b, text| {
            b.iter(|| black_box(text.parse::<VerseRef>()))
        });
    }

    group.bench_function("scripture_ref_path", |b| {
        b.iter(|| black_box("MAT 2:3/1:esb/2:ms".parse::<ScriptureRef>()))
    });

    group.finish();
}

// =============================================================================
// Versification Mapping
// =============================================================================

fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_versification");
    let english = Versification::english();

    for target in [VersificationType::Original, VersificationType::Vulgate] {
        let target_vrs = Versification::get_builtin(target).unwrap();
        let verses: Vec<VerseRef> = (1..=66u32)
            .flat_map(|book| {
                let english = Arc::clone(&english);
                (1..=english.last_chapter(book)).map(move |chapter| {
                    VerseRef::from_numbers(book, chapter, 1, Arc::clone(&english))
                })
            })
            .collect();

        group.throughput(Throughput::Elements(verses.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("all_chapters", target.name()),
            &verses,
            |b, verses| {
                b.iter(|| {
                    for verse in verses {
                        black_box(verse.change_versification(&target_vrs));
                    }
                })
            },
        );
    }

    group.finish();
}

// =============================================================================
// Loading
// =============================================================================

fn bench_loading(c: &mut Criterion) {
    let text = Versification::english().to_vrs();
    c.bench_function("load_english_vrs", |b| {
        b.iter(|| black_box(Versification::load(&text, "English")))
    });
}

criterion_group!(benches, bench_parsing, bench_mapping, bench_loading);
criterion_main!(benches);

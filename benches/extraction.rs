//! Benchmarks for outline-guided extraction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use folio::{split_pages, ChapterIndexEntry, Extractor, TitleMatcher, WordCount};

/// A document of `chapters` chapters, each with four subchapters spread over
/// a few pages.
fn sample_document(chapters: usize) -> (String, Vec<ChapterIndexEntry>) {
    let paragraph = "The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs.";
    let mut lines = Vec::new();
    let mut outline = Vec::with_capacity(chapters);
    let mut page = 0;

    for c in 0..chapters {
        let title = format!("Chapter {c} Results");
        let subchapters: Vec<String> = (1..=4).map(|s| format!("{s}. Topic {c}-{s}")).collect();

        page += 1;
        lines.push(format!("=== PÁGINA {page} ==="));
        lines.push(title.clone());
        for (s, sub) in subchapters.iter().enumerate() {
            if s % 2 == 1 {
                page += 1;
                lines.push(format!("=== PÁGINA {page} ==="));
            }
            lines.push(sub.clone());
            lines.extend(std::iter::repeat(paragraph.to_string()).take(10));
        }
        outline.push(ChapterIndexEntry::with_subchapters(title, subchapters));
    }

    (lines.join("\n"), outline)
}

fn bench_split_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_pages");

    for chapters in [10, 100, 500] {
        let (text, _) = sample_document(chapters);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("split", chapters), &text, |b, text| {
            b.iter(|| split_pages(black_box(text)))
        });
    }

    group.finish();
}

fn bench_title_matcher(c: &mut Criterion) {
    let matcher = TitleMatcher::new();
    let line = "Chapter 12: Results — Discussion (continued)";

    c.bench_function("match_normalized", |b| {
        b.iter(|| matcher.matches(black_box(line), black_box("Results: Discussion (continued)")))
    });
    c.bench_function("match_miss", |b| {
        b.iter(|| matcher.matches(black_box(line), black_box("Appendix")))
    });
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let extractor = Extractor::new(WordCount);

    for chapters in [10, 100] {
        let (text, outline) = sample_document(chapters);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("extract", chapters),
            &(text, outline),
            |b, (text, outline)| b.iter(|| extractor.extract(black_box(text), black_box(outline))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_split_pages, bench_title_matcher, bench_extract);
criterion_main!(benches);

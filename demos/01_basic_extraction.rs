//! Basic Extraction
//!
//! The minimal example: pull chapter sections out of paginated OCR text.
//!
//! ```bash
//! RUST_LOG=folio=info cargo run --example 01_basic_extraction
//! ```

use folio::{ChapterIndexEntry, Extractor, WordCount};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("folio=info")),
        )
        .init();

    let document = "=== PÁGINA 1 ===\n\
        INFORME ANUAL\n\
        === PÁGINA 2 ===\n\
        Introduction\n\
        This report covers the fiscal year.\n\
        === PÁGINA 3 ===\n\
        Financial Results\n\
        1. Revenue\n\
        Revenue grew by twelve percent.\n\
        2. Costs\n\
        Costs were flat.\n\
        === PÁGINA 4 ===\n\
        Most savings came from logistics.\n\
        === PÁGINA 5 ===\n\
        Outlook\n\
        We expect modest growth.";

    let outline = [
        ChapterIndexEntry::flat("Introduction"),
        ChapterIndexEntry::with_subchapters("Financial results", ["1. Revenue", "2. Costs"]),
        ChapterIndexEntry::flat("Outlook"),
        ChapterIndexEntry::flat("Risks"),
    ];

    let extraction = Extractor::new(WordCount).extract(document, &outline);

    for section in &extraction.sections {
        println!(
            "[{}..={}] {} / {} ({} tokens)",
            section.from_page,
            section.to_page,
            section.chapter_title,
            section.subchapter.title,
            section.subchapter.token_count
        );
        println!("    {:?}", section.subchapter.text);
    }

    // "Risks" is not in the document; it is reported, not fatal.
    println!("\n{}", extraction.report);
}

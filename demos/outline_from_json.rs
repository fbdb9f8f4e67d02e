//! Outline From JSON
//!
//! Load the outline and settings the way an upstream chaptering step would
//! hand them over, and emit sections as JSON for an indexer.
//!
//! ```bash
//! cargo run --example outline_from_json
//! ```

use folio::{CharEstimate, ExtractConfig, Extractor, Outline};

const OUTLINE: &str = r#"{
    "chapters": [
        {"chapterTitle": "Introduction"},
        {"chapterTitle": "Methods", "subchapterTitles": ["2.1 Sampling", "2.2 Analysis"]}
    ]
}"#;

const CONFIG: &str = r#"{"substring_tier": false, "max_heading_chars": 60}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let document = "=== PÁGINA 1 ===\n\
        Contents\n\
        Introduction ..... 2\n\
        Methods .......... 2\n\
        === PÁGINA 2 ===\n\
        Introduction\n\
        Why we did this.\n\
        Methods\n\
        2.1 Sampling\n\
        Random draws.\n\
        === PÁGINA 3 ===\n\
        2.2 Analysis\n\
        Regression.";

    let outline = Outline::from_json(OUTLINE)?;
    let config: ExtractConfig = serde_json::from_str(CONFIG)?;

    let extraction = Extractor::new(CharEstimate)
        .with_config(config)?
        .try_extract(document, outline.chapters())?;

    println!("{}", serde_json::to_string_pretty(&extraction.sections)?);
    eprintln!("{}", extraction.report);
    Ok(())
}

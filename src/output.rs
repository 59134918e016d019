//! Output formatting for check results (console, JSON, HTML report).

use crate::detect::escape_html;
use crate::models::{CorpusStats, Document, PairReport, RankedDocument, SkippedDocument};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write any result as pretty JSON.
pub fn write_json<T: Serialize, W: Write>(result: &T, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(result)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write any result as pretty JSON to a file.
pub fn write_json_file<T: Serialize>(result: &T, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(result, &mut file)
}

/// Write a pairwise comparison summary to stdout.
pub fn print_pair_result(report: &PairReport) {
    println!("\n{}", "=".repeat(40));
    println!("      Plagiarism Check Result");
    println!("{}", "=".repeat(40));
    println!(
        "The similarity between '{}' and '{}' is: {:.2}%",
        report.source_name, report.suspect_name, report.comparison.percentage
    );
    println!(
        "Flagged sentences: {} of {} (threshold {:.2})",
        report.matches.match_count(),
        report.suspect_sentences.len(),
        report.parameters.threshold
    );
    for &index in &report.matches.matched {
        if let Some(sentence) = report.suspect_sentences.get(index) {
            println!("  [{}] {}", index + 1, truncate_text(sentence, 100));
        }
    }
    println!("{}", "=".repeat(40));
}

/// Format one ranked entry as `- name: 12.34% similar`.
pub fn format_ranked(entry: &RankedDocument) -> String {
    format!("- {}: {:.2}% similar", entry.filename, entry.percentage)
}

/// Write a ranking (best first) to stdout.
pub fn print_ranking(title: &str, results: &[RankedDocument], skipped: &[SkippedDocument]) {
    println!("\n=== {} ===", title);
    if results.is_empty() {
        println!("No documents to compare against.");
    }
    for entry in results {
        println!("{}", format_ranked(entry));
    }
    if !skipped.is_empty() {
        println!("\nSkipped {} file(s):", skipped.len());
        for doc in skipped {
            println!("  {}: {}", doc.filename, doc.reason);
        }
    }
}

pub fn print_corpus_listing(documents: &[Document]) {
    if documents.is_empty() {
        println!("The corpus is empty.");
        return;
    }
    println!("{:<40} {:>10}  Uploaded", "Filename", "Chars");
    println!("{}", "-".repeat(72));
    for doc in documents {
        println!(
            "{:<40} {:>10}  {}",
            truncate_text(&doc.filename, 40),
            doc.text.chars().count(),
            doc.uploaded_at.as_deref().unwrap_or("-")
        );
    }
}

pub fn print_stats(stats: &CorpusStats, vocabulary_size: Option<usize>) {
    println!("\n=== Corpus Statistics ===");
    println!("Documents: {}", stats.document_count);
    println!("Total characters: {}", stats.total_characters);
    if let (Some(oldest), Some(newest)) = (&stats.oldest_upload, &stats.newest_upload) {
        println!("Uploads: {} .. {}", oldest, newest);
    }
    match vocabulary_size {
        Some(size) => println!("Model vocabulary: {} terms", size),
        None => println!("Model: not built"),
    }
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

const REPORT_CSS: &str = r#"
        body {
            font-family: Georgia, 'Times New Roman', serif;
            max-width: 860px;
            margin: 2rem auto;
            padding: 0 1rem;
            line-height: 1.7;
            color: #1f2937;
        }
        .summary {
            font-family: system-ui, sans-serif;
            border-bottom: 1px solid #e5e7eb;
            margin-bottom: 1.5rem;
        }
        .highlight {
            background-color: #fff8c4;
            padding: 2px 4px;
            border-radius: 4px;
            border: 1px solid #f0e68c;
        }
"#;

/// Standalone HTML page showing the suspect text with matched sentences
/// highlighted.
pub fn generate_html_report(report: &PairReport) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Plagiarism Report - {suspect}</title>
    <style>{css}</style>
</head>
<body>
    <div class="summary">
        <h1>Plagiarism Report</h1>
        <p>Source: <strong>{source}</strong><br>
        Suspect: <strong>{suspect}</strong></p>
        <p>Overall similarity: <strong>{percentage:.2}%</strong><br>
        Flagged sentences: {flagged} of {total} (threshold {threshold:.2})</p>
    </div>
    <div class="document">
{rendered}
    </div>
</body>
</html>
"##,
        css = REPORT_CSS,
        source = escape_html(&report.source_name),
        suspect = escape_html(&report.suspect_name),
        percentage = report.comparison.percentage,
        flagged = report.matches.match_count(),
        total = report.suspect_sentences.len(),
        threshold = report.parameters.threshold,
        rendered = report.rendered,
    )
}

pub fn write_html_report_file(report: &PairReport, path: &Path) -> Result<(), OutputError> {
    std::fs::write(path, generate_html_report(report))?;
    Ok(())
}

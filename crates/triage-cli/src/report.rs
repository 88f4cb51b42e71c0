//! Report rendering

use serde::Serialize;
use std::fmt::Write;
use triage_core::{CategorizedBatch, TriageCounts};

#[derive(Serialize)]
struct JsonReport<'a> {
    counts: TriageCounts,
    categories: &'a CategorizedBatch,
}

/// `{"counts": {...}, "categories": {...}}`
pub fn render_json(batch: &CategorizedBatch) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        counts: batch.counts(),
        categories: batch,
    })
}

/// Counts followed by each bucket's comments
pub fn render_text(batch: &CategorizedBatch) -> String {
    let counts = batch.counts();
    let mut out = String::new();

    let _ = writeln!(out, "Total comments: {}", counts.total);
    for (category, comments) in batch.iter() {
        let _ = writeln!(out, "  {:<9}{}", category.as_str(), comments.len());
    }

    for (category, comments) in batch.iter() {
        if comments.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n[{}]", category);
        for comment in comments {
            let _ = writeln!(out, "- {}", comment);
        }
    }

    out.trim_end().to_string()
}

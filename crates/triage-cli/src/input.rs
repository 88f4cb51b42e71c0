//! Batch input: one comment per line

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read comments from a file, or stdin when no path is given
pub fn read_comments(path: Option<&Path>) -> Result<Vec<String>> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read comments from {}", path.display()))?,
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read comments from stdin")?;
            content
        }
    };

    Ok(parse_comments(&content))
}

/// Split into comments, skipping blank lines
pub fn parse_comments(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

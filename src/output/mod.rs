use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::extract::ExtractedContent;

/// Save an extraction result to file
pub async fn save_to_file(content: &ExtractedContent, path: &Path, format: &OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => format_as_text(content),
        OutputFormat::Json => format_as_json(content)?,
    };

    fs_err::write(path, rendered)?;
    Ok(())
}

/// Print an extraction result to console
pub fn print_to_console(content: &ExtractedContent, format: &OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => format_as_text(content),
        OutputFormat::Json => format_as_json(content)?,
    };

    println!("{}", rendered);
    Ok(())
}

fn format_as_text(content: &ExtractedContent) -> String {
    let mut out = String::new();

    out.push_str(&format!("Title:    {}\n", content.metadata.title));
    out.push_str(&format!("Author:   {}\n", content.metadata.author));
    out.push_str(&format!("Duration: {}\n", content.metadata.duration));
    out.push_str(&format!("URL:      {}\n", content.url));
    if let Some(thumbnail) = content.metadata.thumbnails.first() {
        out.push_str(&format!("Thumbnail: {}\n", thumbnail));
    }
    out.push_str(&format!("Segments: {}\n", content.transcript.len()));
    out.push('\n');
    out.push_str(&content.full_transcript);
    out.push('\n');

    out
}

fn format_as_json(content: &ExtractedContent) -> Result<String> {
    Ok(serde_json::to_string_pretty(content)?)
}

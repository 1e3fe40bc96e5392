//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use fourthwall_domain::{BookRecord, VoiceRoster};
use fourthwall_extractor::ExtractionOutcome;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Descriptions longer than this are cut in table output
const DESCRIPTION_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format one book's characters.
    ///
    /// Voices are shown by their roster label when the roster knows the id.
    pub fn format_record(&self, record: &BookRecord, roster: &VoiceRoster) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(record
                .characters
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.format_record_table(record, roster)),
        }
    }

    fn format_record_table(&self, record: &BookRecord, roster: &VoiceRoster) -> String {
        let title = record.book_title.as_deref().unwrap_or("Untitled");
        let heading = self.colorize(&format!("{} ({})", title, record.book_id), "cyan");

        if record.characters.is_empty() {
            return format!("{}\n{}", heading, self.colorize("No characters.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Voice", "Description"]);

        for character in &record.characters {
            let voice = roster
                .get(&character.assigned_voice_id)
                .map(|v| v.label.as_str())
                .unwrap_or(character.assigned_voice_id.as_str());
            builder.push_record([
                character.name.as_str(),
                voice,
                &truncate(&character.description, DESCRIPTION_WIDTH),
            ]);
        }

        format!("{}\n{}", heading, self.build_table(builder))
    }

    /// Format the list of cached books.
    pub fn format_books(&self, books: &[BookRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(books)?),
            OutputFormat::Quiet => Ok(books
                .iter()
                .map(|b| b.book_id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if books.is_empty() {
                    return Ok(self.colorize("No books cached.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Book ID", "Title", "Characters"]);
                for book in books {
                    builder.push_record([
                        book.book_id.to_string(),
                        book.book_title.clone().unwrap_or_default(),
                        book.characters.len().to_string(),
                    ]);
                }
                Ok(self.build_table(builder))
            }
        }
    }

    /// Format the voice roster.
    pub fn format_voices(&self, roster: &VoiceRoster) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(roster)?),
            OutputFormat::Quiet => Ok(roster
                .iter()
                .map(|v| v.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Label", "Descriptor"]);
                for voice in roster.iter() {
                    builder.push_record([
                        voice.id.as_str(),
                        voice.label.as_str(),
                        voice.descriptor.as_str(),
                    ]);
                }
                Ok(self.build_table(builder))
            }
        }
    }

    /// Format an extraction outcome as JSON.
    pub fn format_outcome(&self, outcome: &ExtractionOutcome) -> Result<String> {
        Ok(serde_json::to_string_pretty(outcome)?)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    fn build_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

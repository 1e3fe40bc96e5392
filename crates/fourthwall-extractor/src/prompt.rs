//! LLM prompt engineering for character extraction

use fourthwall_domain::VoiceRoster;

/// First `max_chars` characters of `text`, never splitting a code point
pub fn take_sample(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Builds the extraction prompt for one book sample
pub struct PromptBuilder<'a> {
    sample: &'a str,
    roster: &'a VoiceRoster,
    min_characters: usize,
    max_characters: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(sample: &'a str, roster: &'a VoiceRoster) -> Self {
        Self {
            sample,
            roster,
            min_characters: 4,
            max_characters: 8,
        }
    }

    /// How many characters the model should select
    pub fn with_character_range(mut self, min: usize, max: usize) -> Self {
        self.min_characters = min;
        self.max_characters = max.max(min);
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. What to ignore and what counts as a character
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Selection size and per-character output
        prompt.push_str(&format!(
            "Task:\nIdentify the {} to {} most important fictional characters in the narrative section of this text.\n\n",
            self.min_characters, self.max_characters
        ));
        prompt.push_str(PER_CHARACTER_TASK);
        prompt.push_str("\n\n");

        // 3. The voice roster
        prompt.push_str("Available Voices:\n");
        prompt.push_str(&self.roster_json());
        prompt.push_str("\n\n");

        // 4. Output format
        prompt.push_str(OUTPUT_FORMAT);
        prompt.push_str("\n\n");

        // 5. The text to analyze
        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.sample);
        prompt.push_str("\n---\n");

        prompt
    }

    fn roster_json(&self) -> String {
        serde_json::to_string_pretty(self.roster).unwrap_or_default()
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Analyze the following text from a book.

CRITICAL INSTRUCTION:
The provided text may contain a Title Page, Preface, Introduction, or Copyright notices.
COMPLETELY IGNORE these sections. Do NOT list the author, editors, translators, or critics as characters.

Only extract fictional characters who actually appear, speak, or are described in the story itself.

Significance rules:
- Only characters with a proper name
- The character speaks, or matters to the plot
- Skip characters who appear only once
- Skip generic roles such as "the servant" or "the old man""#;

const PER_CHARACTER_TASK: &str = r#"For each character:
1. Write a short 'description' (biography).
2. Write a 'system_prompt' that defines their personality, speech style, and hidden motivations.
3. Assign them the BEST matching 'assigned_voice_id' from the list of Available Voices below. Use the "id" value exactly."#;

const OUTPUT_FORMAT: &str = r#"Return the result strictly as a JSON object with this structure:
{
  "book_title": "Title detected",
  "characters": [
    {
      "name": "Character Name",
      "description": "Short bio",
      "system_prompt": "You are [Name]. You speak with...",
      "assigned_voice_id": "The id from the list above"
    }
  ]
}

Return ONLY valid JSON, no markdown code blocks, no explanations."#;

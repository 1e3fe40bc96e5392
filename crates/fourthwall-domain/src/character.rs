//! Character module - a fictional character with an assigned voice

use serde::{Deserialize, Serialize};

/// A fictional character extracted from a book
///
/// Produced by the extraction engine and never mutated afterwards.
/// `assigned_voice_id` always names a voice in the roster the engine was
/// configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Proper name as it appears in the text
    pub name: String,

    /// Short biography
    pub description: String,

    /// Persona prompt ("You are ... You speak with ...")
    pub system_prompt: String,

    /// Id of the voice profile this character speaks with
    pub assigned_voice_id: String,
}

impl Character {
    /// Create a new character
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
        assigned_voice_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            system_prompt: system_prompt.into(),
            assigned_voice_id: assigned_voice_id.into(),
        }
    }
}

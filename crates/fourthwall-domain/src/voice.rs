//! Voice roster - the catalog of synthesizable voices a character can be given

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single synthesizable voice and the personality traits it suits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Provider voice identifier (what ends up in `assigned_voice_id`)
    pub id: String,

    /// Human-readable label, e.g. "Male Voice 1"
    pub label: String,

    /// Comma-separated traits the model matches characters against
    pub descriptor: String,
}

impl VoiceProfile {
    /// Create a new voice profile
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// Ordered, non-empty set of voices with unique ids
///
/// Built once at startup and handed to the extraction engine. The order is
/// the order the voices are presented to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoiceRoster {
    voices: Vec<VoiceProfile>,
}

impl VoiceRoster {
    /// Build a roster from a list of profiles
    ///
    /// # Errors
    /// Returns error if the list is empty, or an id is blank or repeated
    pub fn new(voices: Vec<VoiceProfile>) -> Result<Self, String> {
        if voices.is_empty() {
            return Err("Voice roster cannot be empty".to_string());
        }

        let mut seen = HashSet::new();
        for voice in &voices {
            if voice.id.trim().is_empty() {
                return Err(format!("Voice '{}' has an empty id", voice.label));
            }
            if !seen.insert(voice.id.as_str()) {
                return Err(format!("Duplicate voice id: {}", voice.id));
            }
        }

        Ok(Self { voices })
    }

    /// Look up a voice by its exact id
    pub fn get(&self, id: &str) -> Option<&VoiceProfile> {
        self.voices.iter().find(|v| v.id == id)
    }

    /// Whether the roster has a voice with this exact id
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a voice reference produced by a model
    ///
    /// Tries the exact id first, then a case-insensitive match on id or
    /// label. Models occasionally echo the label ("Female Voice 2") or add
    /// stray whitespace instead of copying the id verbatim.
    pub fn resolve(&self, reference: &str) -> Option<&VoiceProfile> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        self.get(reference).or_else(|| {
            self.voices.iter().find(|v| {
                v.id.eq_ignore_ascii_case(reference) || v.label.eq_ignore_ascii_case(reference)
            })
        })
    }

    /// Iterate over the voices in roster order
    pub fn iter(&self) -> impl Iterator<Item = &VoiceProfile> {
        self.voices.iter()
    }

    /// Number of voices
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Always false for a constructed roster; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl Default for VoiceRoster {
    /// The built-in six-voice troupe
    fn default() -> Self {
        Self {
            voices: vec![
                VoiceProfile::new(
                    "2mltbVQP21Fq8XgIfRQJ",
                    "Male Voice 1",
                    "Young, Confident, Energetic, Male, British",
                ),
                VoiceProfile::new(
                    "NmpxQl3ZUbfh8HgoNCGM",
                    "Male Voice 2",
                    "Neutral, Professional, Clear, Male, British",
                ),
                VoiceProfile::new(
                    "6sFKzaJr574YWVu4UuJF",
                    "Male Voice 3",
                    "Deep, Strong, Wise, Male, British",
                ),
                VoiceProfile::new(
                    "goT3UYdM9bhm0n2lmKQx",
                    "Male Voice 4",
                    "Deep, Raspy, Dark, Low, Male, British",
                ),
                VoiceProfile::new(
                    "rfkTsdZrVWEVhDycUYn9",
                    "Female Voice 1",
                    "Witty, Sharp-tongued, Young, Female, British",
                ),
                VoiceProfile::new(
                    "rCmVtv8cYU60uhlsOo1M",
                    "Female Voice 2",
                    "Soft, British, Young, Warm, Female, British",
                ),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for VoiceRoster {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let voices = Vec::<VoiceProfile>::deserialize(deserializer)?;
        VoiceRoster::new(voices).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = VoiceRoster::default();
        assert_eq!(roster.len(), 6);
        assert!(roster.contains("rCmVtv8cYU60uhlsOo1M"));
        assert!(!roster.contains("unknown"));
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(VoiceRoster::new(vec![]).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let voices = vec![
            VoiceProfile::new("a", "A", "x"),
            VoiceProfile::new("a", "B", "y"),
        ];
        let err = VoiceRoster::new(voices).unwrap_err();
        assert!(err.contains("Duplicate"));
    }

    #[test]
    fn test_resolve_by_id_and_label() {
        let roster = VoiceRoster::default();

        assert_eq!(roster.resolve("goT3UYdM9bhm0n2lmKQx").unwrap().label, "Male Voice 4");
        assert_eq!(roster.resolve("  goT3UYdM9bhm0n2lmKQx ").unwrap().label, "Male Voice 4");
        assert_eq!(roster.resolve("female voice 2").unwrap().id, "rCmVtv8cYU60uhlsOo1M");
        assert!(roster.resolve("").is_none());
        assert!(roster.resolve("Narrator").is_none());
    }

    #[test]
    fn test_exact_id_wins_over_case_insensitive() {
        let voices = vec![
            VoiceProfile::new("abc", "First", "x"),
            VoiceProfile::new("ABC", "Second", "y"),
        ];
        let roster = VoiceRoster::new(voices).unwrap();
        assert_eq!(roster.resolve("ABC").unwrap().label, "Second");
    }

    #[test]
    fn test_roster_deserialize_validates() {
        let ok: Result<VoiceRoster, _> =
            serde_json::from_str(r#"[{"id": "v1", "label": "One", "descriptor": "calm"}]"#);
        assert_eq!(ok.unwrap().len(), 1);

        let empty: Result<VoiceRoster, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }
}

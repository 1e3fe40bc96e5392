//! Parse LLM output into characters

use crate::types::RawResponse;
use fourthwall_domain::{Character, VoiceRoster};
use serde_json::Value;
use tracing::warn;

/// Remove a surrounding markdown code fence, if any
///
/// Accepts an opening fence with an optional language tag (```` ```json ````)
/// and an optional closing fence. Unfenced text is returned trimmed.
///
/// # Errors
/// Returns error if the text is fenced but the fence holds nothing
pub fn strip_code_fence(text: &str) -> Result<&str, String> {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return Ok(trimmed);
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.trim_end();
    let body = rest.strip_suffix("```").unwrap_or(rest).trim();

    if body.is_empty() {
        return Err("Empty code block".to_string());
    }
    Ok(body)
}

/// Parse model output into a title and a raw character list
///
/// # Errors
/// Returns the rejection reason if the text is not a JSON object or has no
/// non-empty `characters` array
pub(crate) fn parse_response(text: &str) -> Result<RawResponse, String> {
    let json_str = strip_code_fence(text)?;

    let json: Value =
        serde_json::from_str(json_str).map_err(|e| format!("JSON parse error: {}", e))?;

    let mut obj = match json {
        Value::Object(obj) => obj,
        _ => return Err("Expected JSON object".to_string()),
    };

    let characters = match obj.remove("characters") {
        Some(Value::Array(list)) if !list.is_empty() => list,
        Some(Value::Array(_)) | Some(Value::Null) | None => {
            return Err("No characters found in the response".to_string())
        }
        Some(_) => return Err("'characters' is not an array".to_string()),
    };

    let book_title = obj
        .get("book_title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(RawResponse {
        book_title,
        characters,
    })
}

/// Turn raw character entries into validated characters
///
/// Entries that are not objects, have a blank name, or reference a voice
/// the roster cannot resolve are dropped. Voice references are rewritten to
/// the canonical roster id. At most `max_characters` are kept.
pub(crate) fn validate_characters(
    raw: Vec<Value>,
    roster: &VoiceRoster,
    max_characters: usize,
) -> Vec<Character> {
    let mut characters = Vec::new();

    for (idx, entry) in raw.into_iter().enumerate() {
        match parse_character(&entry, roster) {
            Ok(character) => characters.push(character),
            Err(e) => warn!("Dropping character {}: {}", idx, e),
        }
    }

    if characters.len() > max_characters {
        warn!(
            "Model returned {} characters; keeping the first {}",
            characters.len(),
            max_characters
        );
        characters.truncate(max_characters);
    }

    characters
}

/// Parse a single character from JSON
fn parse_character(json: &Value, roster: &VoiceRoster) -> Result<Character, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Character is not a JSON object".to_string())?;

    let text = |field: &str| {
        obj.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
    };

    let name = text("name");
    if name.is_empty() {
        return Err("Missing or blank 'name'".to_string());
    }

    let voice_ref = text("assigned_voice_id");
    let voice = roster
        .resolve(voice_ref)
        .ok_or_else(|| format!("'{}' has unknown voice '{}'", name, voice_ref))?;

    Ok(Character::new(
        name,
        text("description"),
        text("system_prompt"),
        voice.id.clone(),
    ))
}

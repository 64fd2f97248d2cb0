//! Entity extraction stage of the ingestion pipeline.
//!
//! Asks the text model for the NPCs, locations, items and events mentioned in a
//! recap, as a JSON array. Extraction is strictly best-effort: any failure on
//! this path (unconfigured key, network, garbage output) degrades to an empty
//! list so ingestion can still record the session itself.

use crate::error::Error;
use crate::gateway::gemini::GeminiClient;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

const DEFAULT_ICON: &str = "📄";

/// One wiki-worthy entity pulled out of a recap. Never persisted as-is; the
/// merge engine decides whether it becomes a new page or an update to one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedEntity {
    /// NPC, Location, Item or Event
    pub entity_type: String,
    pub title: String,
    pub content: String,
    pub icon: String,
    /// Titles of other pages this entity is connected to
    pub related_to: Vec<String>,
}

/// Strip a surrounding Markdown code fence (``` or ```json) from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, if any
    match inner.split_once('\n') {
        Some((first_line, rest)) if first_line.trim().chars().all(char::is_alphanumeric) => {
            rest.trim()
        }
        _ => inner.trim(),
    }
}

/// Parse model output into entities, validating each array element on its own.
/// Elements missing a title or a type are discarded individually; anything that
/// is not a JSON array at all yields an empty list.
pub fn parse_entities(raw: &str) -> Vec<ExtractedEntity> {
    let stripped = strip_code_fences(raw);

    let Ok(serde_json::Value::Array(elements)) = serde_json::from_str(stripped) else {
        warn!("Extraction output is not a JSON array; discarding");
        return Vec::new();
    };

    elements
        .into_iter()
        .filter_map(|element| {
            let title = non_empty_string(element.get("title"))?;
            let entity_type = non_empty_string(element.get("type"))?;

            Some(ExtractedEntity {
                entity_type,
                title,
                content: non_empty_string(element.get("content")).unwrap_or_default(),
                icon: non_empty_string(element.get("icon"))
                    .unwrap_or_else(|| DEFAULT_ICON.to_string()),
                related_to: element
                    .get("relatedTo")
                    .and_then(|value| value.as_array())
                    .map(|titles| {
                        titles
                            .iter()
                            .filter_map(|title| title.as_str())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            })
        })
        .collect()
}

fn non_empty_string(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn extraction_prompt(recap: &str) -> String {
    format!(
        r#"Extract the notable entities from this tabletop RPG session recap.

Return a JSON array where every element has this shape:
{{
  "type": "NPC" | "Location" | "Item" | "Event",
  "title": "Name of the entity",
  "content": "One or two sentences about it, from the recap only",
  "icon": "a single emoji that fits the entity",
  "relatedTo": ["titles of other entities in this array it is connected to"]
}}

Return ONLY the JSON array, no markdown or explanation.

Recap:
{recap}"#
    )
}

/// Extract entities from a recap. Never fails: every error on this path is
/// logged and degraded to an empty list.
pub async fn extract_entities(config: &Config, recap: &str) -> Vec<ExtractedEntity> {
    let raw = match run_extraction(config, recap).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Entity extraction degraded to empty: {:?}", e);
            return Vec::new();
        }
    };

    let entities = parse_entities(&raw);
    info!("Extracted {} entities from recap", entities.len());
    entities
}

async fn run_extraction(config: &Config, recap: &str) -> Result<String, Error> {
    let gemini = GeminiClient::from_config(config)?;
    gemini.generate(&extraction_prompt(recap)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn parses_well_formed_entities() {
        let raw = r#"```json
        [
          {"type": "NPC", "title": "Griznak", "content": "A goblin merchant.",
           "icon": "👺", "relatedTo": ["Dark Cave"]},
          {"type": "Location", "title": "Dark Cave", "content": "Where Griznak trades.",
           "icon": "🕳️", "relatedTo": ["Griznak"]}
        ]
        ```"#;

        let entities = parse_entities(raw);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].title, "Griznak");
        assert_eq!(entities[0].entity_type, "NPC");
        assert_eq!(entities[0].related_to, vec!["Dark Cave".to_string()]);
        assert_eq!(entities[1].title, "Dark Cave");
    }

    #[test]
    fn discards_elements_missing_title_or_type_individually() {
        let raw = r#"[
          {"type": "NPC", "title": "Griznak"},
          {"type": "Item"},
          {"title": "Dark Cave"},
          {"type": "Event", "title": "  "},
          {"type": "Location", "title": "Sunken Vale"}
        ]"#;

        let titles: Vec<String> = parse_entities(raw).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Griznak".to_string(), "Sunken Vale".to_string()]);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let entities = parse_entities(r#"[{"type": "NPC", "title": "Griznak"}]"#);
        assert_eq!(entities[0].content, "");
        assert_eq!(entities[0].icon, DEFAULT_ICON);
        assert!(entities[0].related_to.is_empty());
    }

    #[test]
    fn garbage_output_degrades_to_empty() {
        assert!(parse_entities("I could not find any entities.").is_empty());
        assert!(parse_entities(r#"{"not": "an array"}"#).is_empty());
        assert!(parse_entities("").is_empty());
    }
}

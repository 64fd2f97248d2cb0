//! Cross-reference suggestions between wiki pages.
//!
//! Asks the text model which of a campaign's other pages connect thematically
//! to a given entry. Suggestions are decorative; every failure mode on this
//! path degrades to an empty list.

use crate::error::Error;
use crate::extraction::strip_code_fences;
use crate::gateway::gemini::GeminiClient;
use entity::wiki_entries;
use log::*;
use service::config::Config;

const MAX_SUGGESTIONS: usize = 5;

/// Keep only suggested titles that actually exist among the candidate titles,
/// excluding the entry's own title, deduplicated, capped at five. Hallucinated
/// titles are silently dropped.
pub fn filter_to_existing(
    suggested: Vec<String>,
    entry_title: &str,
    existing_titles: &[String],
) -> Vec<String> {
    let mut filtered: Vec<String> = Vec::new();

    for title in suggested {
        if title != entry_title
            && existing_titles.contains(&title)
            && !filtered.contains(&title)
        {
            filtered.push(title);
        }
        if filtered.len() == MAX_SUGGESTIONS {
            break;
        }
    }

    filtered
}

pub fn suggestion_prompt(entry: &wiki_entries::Model, existing_titles: &[String]) -> String {
    format!(
        r#"A tabletop RPG campaign wiki has a page titled "{}" with this content:

{}

The other pages in the wiki are:
{}

Which of those other pages are thematically connected to this one? Return a
JSON array of up to {} page titles, chosen ONLY from the list above. Return
ONLY the JSON array, no markdown or explanation."#,
        entry.title,
        entry.content.as_deref().unwrap_or(""),
        existing_titles.join("\n"),
        MAX_SUGGESTIONS
    )
}

/// Suggest related pages for one entry given the campaign's other entries.
/// No other pages, an unconfigured text service or any upstream failure all
/// yield an empty list.
pub async fn suggest_related(
    config: &Config,
    entry: &wiki_entries::Model,
    others: &[wiki_entries::Model],
) -> Vec<String> {
    let existing_titles: Vec<String> = others
        .iter()
        .filter(|other| other.id != entry.id)
        .map(|other| other.title.clone())
        .collect();

    if existing_titles.is_empty() {
        return Vec::new();
    }

    let raw = match run_suggestion(config, entry, &existing_titles).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Suggestions degraded to empty: {:?}", e);
            return Vec::new();
        }
    };

    let suggested: Vec<String> = serde_json::from_str(strip_code_fences(&raw)).unwrap_or_default();
    filter_to_existing(suggested, &entry.title, &existing_titles)
}

async fn run_suggestion(
    config: &Config,
    entry: &wiki_entries::Model,
    existing_titles: &[String],
) -> Result<String, Error> {
    let gemini = GeminiClient::from_config(config)?;
    gemini.generate(&suggestion_prompt(entry, existing_titles)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<String> {
        ["Griznak", "Dark Cave", "Sunken Vale", "Mirelle"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn drops_hallucinated_titles() {
        let filtered = filter_to_existing(
            vec!["Griznak".to_string(), "The Invented Keep".to_string()],
            "Home",
            &existing(),
        );

        assert_eq!(filtered, vec!["Griznak".to_string()]);
    }

    #[test]
    fn excludes_the_entry_itself_and_duplicates() {
        let filtered = filter_to_existing(
            vec![
                "Griznak".to_string(),
                "Griznak".to_string(),
                "Dark Cave".to_string(),
            ],
            "Griznak",
            &existing(),
        );

        assert_eq!(filtered, vec!["Dark Cave".to_string()]);
    }

    #[test]
    fn caps_suggestions_at_five() {
        let many: Vec<String> = (0..10).map(|i| format!("Page {i}")).collect();
        let filtered = filter_to_existing(many.clone(), "Home", &many);

        assert_eq!(filtered.len(), 5);
    }
}

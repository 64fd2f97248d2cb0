//! Recap stage of the ingestion pipeline.
//!
//! Turns a raw transcript into a structured session recap. The recap is
//! returned to the caller for review; nothing is persisted here.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::gateway::gemini::GeminiClient;
use log::*;
use service::config::Config;

/// Transcripts beyond this length are truncated before prompting; enough
/// context for a recap without blowing the model's input budget.
const MAX_TRANSCRIPT_CHARS: usize = 30_000;

/// Truncate a transcript to the prompt budget, respecting char boundaries.
pub fn truncate_transcript(transcript: &str) -> &str {
    match transcript.char_indices().nth(MAX_TRANSCRIPT_CHARS) {
        Some((byte_index, _)) => &transcript[..byte_index],
        None => transcript,
    }
}

/// Prompt demanding the fixed recap layout the wiki pipeline expects downstream.
pub fn recap_prompt(transcript: &str) -> String {
    format!(
        r#"You are the chronicler of a tabletop RPG campaign. Write a session recap from
the transcript below.

Use exactly this structure, in Markdown:

# [Session Title]

## Key Events
## Loot & Rewards
## NPCs
## Notable Quotes

Keep the recap in the same language as the transcript. Invent nothing that is
not in the transcript; leave a section empty if nothing applies.

Transcript:
{}"#,
        truncate_transcript(transcript)
    )
}

/// Generate a recap for a transcript. An empty transcript is rejected as invalid
/// input before any model call is made.
pub async fn generate_recap(config: &Config, transcript: &str) -> Result<String, Error> {
    if transcript.trim().is_empty() {
        warn!("Refusing to generate a recap from an empty transcript");
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid,
            )),
        });
    }

    let gemini = GeminiClient::from_config(config)?;
    gemini.generate(&recap_prompt(transcript)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_transcripts_pass_through_untouched() {
        let transcript = "The party entered the Dark Cave.";
        assert_eq!(truncate_transcript(transcript), transcript);
    }

    #[test]
    fn long_transcripts_truncate_to_the_budget() {
        let transcript = "a".repeat(MAX_TRANSCRIPT_CHARS + 500);
        assert_eq!(truncate_transcript(&transcript).len(), MAX_TRANSCRIPT_CHARS);
    }

    #[test]
    fn truncation_respects_multibyte_char_boundaries() {
        // 3 bytes per char, so byte length exceeds the budget well before char count does
        let transcript = "日".repeat(MAX_TRANSCRIPT_CHARS + 10);
        let truncated = truncate_transcript(&transcript);
        assert_eq!(truncated.chars().count(), MAX_TRANSCRIPT_CHARS);
        assert!(truncated.is_char_boundary(truncated.len()));
    }

    #[test]
    fn prompt_contains_required_sections() {
        let prompt = recap_prompt("some transcript");
        for section in [
            "# [Session Title]",
            "## Key Events",
            "## Loot & Rewards",
            "## NPCs",
            "## Notable Quotes",
        ] {
            assert!(prompt.contains(section), "missing section {section}");
        }
        assert!(prompt.contains("some transcript"));
    }
}

use tracing::info;

use crate::models::{FormInput, PromptMode, SectionReport};
use crate::services::llm::{LlmClient, LlmError};
use crate::services::prompt;

const SECTION_MAX_TOKENS: u32 = 500;
const MONOLITHIC_MAX_TOKENS: u32 = 800;

/// Heading the monolithic variant's single report renders under.
pub const ONE_PAGER_TITLE: &str = "One-Page Summary";

/// Run the generation for one button press. Requests go out strictly
/// sequentially, one per selected section (or exactly one in monolithic
/// mode), and the first failure aborts the whole run: the caller gets either
/// every requested section or none.
pub async fn generate_insights(
    form: &FormInput,
    doc_text: &str,
    mode: PromptMode,
    llm: &LlmClient,
) -> Result<Vec<SectionReport>, LlmError> {
    match mode {
        PromptMode::Sectioned => {
            let mut reports = Vec::with_capacity(form.sections.len());
            for &section in &form.sections {
                let prompt = prompt::section_prompt(section, form, doc_text);
                info!(section = section.key(), "requesting section completion");
                let body = llm.complete(&prompt, SECTION_MAX_TOKENS).await?;
                reports.push(SectionReport {
                    title: section.title().to_string(),
                    caption: Some(section.caption()),
                    body,
                });
            }
            Ok(reports)
        }
        PromptMode::Monolithic => {
            let prompt = prompt::monolithic_prompt(form, doc_text);
            info!("requesting monolithic completion");
            let body = llm.complete(&prompt, MONOLITHIC_MAX_TOKENS).await?;
            Ok(vec![SectionReport {
                title: ONE_PAGER_TITLE.to_string(),
                caption: None,
                body,
            }])
        }
    }
}

/// Count, per competitor, the case-insensitive literal occurrences of that
/// competitor's text in a result body. Matching is plain substring search:
/// a competitor name embedded in a longer word still counts.
pub fn count_mentions(body: &str, competitors: &[String]) -> Vec<(String, usize)> {
    let haystack = body.to_lowercase();
    competitors
        .iter()
        .map(|competitor| {
            let needle = competitor.to_lowercase();
            let count = if needle.is_empty() {
                0
            } else {
                haystack.matches(&needle).count()
            };
            (competitor.clone(), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitors(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn counts_literal_occurrences_per_competitor() {
        let counts = count_mentions(
            "Acme appears twice here, Acme.",
            &competitors(&["Acme", "Globex"]),
        );
        assert_eq!(counts, vec![("Acme".to_string(), 2), ("Globex".to_string(), 0)]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let counts = count_mentions("ACME and acme and Acme", &competitors(&["aCmE"]));
        assert_eq!(counts[0].1, 3);
    }

    #[test]
    fn substring_of_a_longer_word_still_counts() {
        let counts = count_mentions("The Acmeification of markets", &competitors(&["Acme"]));
        assert_eq!(counts[0].1, 1);
    }

    #[test]
    fn empty_competitor_label_counts_zero() {
        let counts = count_mentions("anything", &competitors(&[""]));
        assert_eq!(counts[0].1, 0);
    }

    #[test]
    fn labels_keep_their_entered_casing() {
        let counts = count_mentions("globex globex", &competitors(&["GloBex"]));
        assert_eq!(counts, vec![("GloBex".to_string(), 2)]);
    }
}

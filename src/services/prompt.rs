//! Prompt assembly for the chat-completion calls.
//!
//! Two variants exist: one prompt per selected section, or a single
//! monolithic prompt asking the model for the whole one-pager. The service
//! runs exactly one of them per process (see [`crate::models::PromptMode`]).

use crate::models::{FormInput, Section};

const ASSISTANT_PREAMBLE: &str = "You are a professional sales insights assistant. ";

/// Shared template footer carrying every form field verbatim.
fn base_block(form: &FormInput, doc_text: &str) -> String {
    format!(
        "\nProduct Name: {}\n\
         Company URL: {}\n\
         Product Category: {}\n\
         Competitors: {}\n\
         Value Proposition: {}\n\
         Target Customer: {}\n\
         Product Overview Document Extract (if provided):\n{}\n",
        form.product_name,
        form.company_url,
        form.product_category,
        form.competitors,
        form.value_proposition,
        form.target_customer,
        doc_text,
    )
}

fn leaders_block(form: &FormInput) -> String {
    if form.manual_leaders.trim().is_empty() {
        String::new()
    } else {
        format!(
            "\nKnown Company Leaders (user provided):\n{}\n",
            form.manual_leaders
        )
    }
}

/// Build the prompt for one section. Leader names are appended only for the
/// leadership section, and only when the user supplied any.
pub fn section_prompt(section: Section, form: &FormInput, doc_text: &str) -> String {
    let instruction = match section {
        Section::CompanyStrategy => {
            "Summarize the company's activities and direction in the relevant industry. \
             Reference any public statements, press releases, or articles by key executives. \
             Mention relevant job postings or technology stack indicators if available."
        }
        Section::CompetitorMentions => {
            "Note any public information about the listed competitors and their \
             relationship to the target company."
        }
        Section::LeadershipInfo => {
            "List key leaders at the prospect company, especially those quoted in \
             recent press releases or articles."
        }
        Section::ProductStrategy => {
            "For public companies, include insights from annual reports or other \
             relevant documents."
        }
    };

    let mut prompt = format!("{ASSISTANT_PREAMBLE}{instruction}\n");
    prompt.push_str(&base_block(form, doc_text));
    if section == Section::LeadershipInfo {
        prompt.push_str(&leaders_block(form));
    }
    prompt
}

/// Build the single prompt that asks for every section at once, including the
/// source-links section that has no per-section counterpart. The model is
/// expected to structure its own output with markdown headings.
pub fn monolithic_prompt(form: &FormInput, doc_text: &str) -> String {
    let mut prompt = format!(
        "{ASSISTANT_PREAMBLE}Produce a one-page sales account summary with these \
         markdown sections, each under a '### ' heading, in this order: \
         Company Strategy, Competitor Mentions, Leadership Information, \
         Product/Strategy Summary, Source Links. \
         In Source Links, list the public sources your statements rely on.\n"
    );
    prompt.push_str(&base_block(form, doc_text));
    prompt.push_str(&leaders_block(form));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> FormInput {
        FormInput {
            product_name: "Acme Tool".to_string(),
            company_url: "acme.com".to_string(),
            product_category: "Data Warehousing".to_string(),
            competitors: "Globex\nInitech".to_string(),
            value_proposition: "Faster queries".to_string(),
            target_customer: "Jordan Smith".to_string(),
            manual_leaders: String::new(),
            sections: Section::ALL.to_vec(),
        }
    }

    #[test]
    fn base_fields_appear_verbatim() {
        let form = sample_form();
        let prompt = section_prompt(Section::CompanyStrategy, &form, "doc extract");
        for needle in [
            "Product Name: Acme Tool",
            "Company URL: acme.com",
            "Product Category: Data Warehousing",
            "Competitors: Globex\nInitech",
            "Value Proposition: Faster queries",
            "Target Customer: Jordan Smith",
            "doc extract",
        ] {
            assert!(prompt.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn leadership_prompt_includes_provided_leaders() {
        let mut form = sample_form();
        form.manual_leaders = "Jane Doe\nJohn Roe".to_string();
        let prompt = section_prompt(Section::LeadershipInfo, &form, "");
        assert!(prompt.contains("Known Company Leaders (user provided):"));
        assert!(prompt.contains("Jane Doe\nJohn Roe"));
    }

    #[test]
    fn leadership_prompt_omits_block_when_leaders_empty() {
        let form = sample_form();
        let prompt = section_prompt(Section::LeadershipInfo, &form, "");
        assert!(!prompt.contains("Known Company Leaders"));
    }

    #[test]
    fn leaders_never_leak_into_other_sections() {
        let mut form = sample_form();
        form.manual_leaders = "Jane Doe".to_string();
        let prompt = section_prompt(Section::CompanyStrategy, &form, "");
        assert!(!prompt.contains("Known Company Leaders"));
    }

    #[test]
    fn section_instructions_are_distinct() {
        let form = sample_form();
        let prompts: Vec<String> = Section::ALL
            .iter()
            .map(|&s| section_prompt(s, &form, ""))
            .collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in prompts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn monolithic_prompt_names_all_five_sections() {
        let form = sample_form();
        let prompt = monolithic_prompt(&form, "");
        for heading in [
            "Company Strategy",
            "Competitor Mentions",
            "Leadership Information",
            "Product/Strategy Summary",
            "Source Links",
        ] {
            assert!(prompt.contains(heading), "missing {heading:?}");
        }
    }
}

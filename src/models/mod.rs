use serde::Serialize;

/// One named category of requested insight output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    CompanyStrategy,
    CompetitorMentions,
    LeadershipInfo,
    ProductStrategy,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::CompanyStrategy,
        Section::CompetitorMentions,
        Section::LeadershipInfo,
        Section::ProductStrategy,
    ];

    /// Stable identifier used as the checkbox value in the form.
    pub fn key(self) -> &'static str {
        match self {
            Section::CompanyStrategy => "company_strategy",
            Section::CompetitorMentions => "competitor_mentions",
            Section::LeadershipInfo => "leadership_info",
            Section::ProductStrategy => "product_strategy",
        }
    }

    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::CompanyStrategy => "Company Strategy",
            Section::CompetitorMentions => "Competitor Mentions",
            Section::LeadershipInfo => "Leadership Information",
            Section::ProductStrategy => "Product/Strategy Summary",
        }
    }

    /// One-line summary shown under the section heading in the output.
    pub fn caption(self) -> &'static str {
        match self {
            Section::CompanyStrategy => {
                "Summary of the company's activities, direction, and public statements in the relevant industry."
            }
            Section::CompetitorMentions => {
                "Mentions and analysis of competitors relevant to the target company."
            }
            Section::LeadershipInfo => {
                "Key leaders at the prospect company, especially those quoted in recent press releases or articles."
            }
            Section::ProductStrategy => {
                "Insights from annual reports or other relevant documents about the company's product or strategy."
            }
        }
    }
}

/// Which prompt-construction variant the service runs. The two variants are
/// alternative designs with different call counts and output structure, so
/// the mode is fixed at startup and never mixed within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// One chat-completion request per selected section.
    Sectioned,
    /// A single request asking the model for the whole one-pager.
    Monolithic,
}

impl PromptMode {
    pub fn from_env() -> Self {
        let value = std::env::var("INSIGHT_MODE").unwrap_or_default();
        match value.to_ascii_lowercase().as_str() {
            "monolithic" => PromptMode::Monolithic,
            "" | "sectioned" => PromptMode::Sectioned,
            other => {
                tracing::warn!(value = other, "unknown INSIGHT_MODE, using sectioned");
                PromptMode::Sectioned
            }
        }
    }
}

/// Everything the user typed into the form. All fields are free text; the
/// newline-delimited ones are split on demand.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormInput {
    pub product_name: String,
    pub company_url: String,
    pub product_category: String,
    pub competitors: String,
    pub value_proposition: String,
    pub target_customer: String,
    pub manual_leaders: String,
    pub sections: Vec<Section>,
}

impl FormInput {
    /// Competitor labels, one per non-empty trimmed line, in entry order.
    pub fn competitor_list(&self) -> Vec<String> {
        self.competitors
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// The uploaded product overview document, held in memory for the request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// One generated section of the output page.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub title: String,
    pub caption: Option<&'static str>,
    pub body: String,
}

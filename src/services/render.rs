//! HTML rendering for the form, results, warning, and error pages.
//!
//! User-entered strings are escaped before they reach the page; the model's
//! section text is inserted as returned so any markup it emitted renders.
//! Competitor mention counts are literal substring counts, charted as
//! server-side SVG.

use html_escape::encode_text;

use crate::models::{PromptMode, Section, SectionReport};
use crate::services::insights::count_mentions;

const PAGE_TITLE: &str = "Sales Agent Prototype";

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 40px auto; max-width: 760px; }
        h1 { font-size: 26px; }
        label { display: block; margin-top: 14px; font-weight: bold; }
        .help { font-weight: normal; color: #666; font-size: 13px; }
        input[type=text], textarea { width: 100%; padding: 6px; margin-top: 4px; box-sizing: border-box; }
        textarea { height: 70px; }
        .info-box { background-color: #f0f8ff; padding: 16px 20px; border-radius: 8px; margin: 20px 0; }
        .sections { margin-top: 8px; }
        .sections label { display: inline-block; font-weight: normal; margin-right: 18px; }
        button { margin-top: 20px; padding: 10px 18px; font-size: 15px; }
        .success { color: #1a7f37; font-weight: bold; }
        .warning { background-color: #fff8e1; border: 1px solid #f0c36d; padding: 14px 18px; border-radius: 6px; }
        .error { background-color: #fdecea; border: 1px solid #e57373; padding: 14px 18px; border-radius: 6px; }
        .caption { color: #666; font-size: 13px; margin-top: -8px; }
        .section-body { margin-bottom: 24px; }
"#;

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{PAGE_TITLE}</title>
    <meta charset="utf-8">
    <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#
    )
}

fn text_input(name: &str, label: &str, help: &str) -> String {
    format!(
        r#"<label for="{name}">{label} <span class="help">{help}</span></label>
<input type="text" id="{name}" name="{name}">"#
    )
}

fn text_area(name: &str, label: &str, help: &str) -> String {
    format!(
        r#"<label for="{name}">{label} <span class="help">{help}</span></label>
<textarea id="{name}" name="{name}"></textarea>"#
    )
}

/// The input form. Section checkboxes only appear in sectioned mode; the
/// monolithic variant always asks for the full one-pager.
pub fn form_page(mode: PromptMode) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>&#128202; {PAGE_TITLE}</h1>\n"));
    body.push_str(
        r#"<div class="info-box">
    <h2>Instructions</h2>
    <ol>
        <li>Fill in all required fields.</li>
        <li>(Optional) Upload a product overview document.</li>
        <li>Click <b>Generate Insights</b> to receive a one-page summary.</li>
        <li>Review the output and use it for your sales preparation.</li>
    </ol>
</div>
<p>Enter the details below to generate account insights for your sales opportunity.</p>
<form action="/generate" method="post" enctype="multipart/form-data">
"#,
    );
    body.push_str(&text_input("product_name", "Product Name", "What product are you selling?"));
    body.push('\n');
    body.push_str(&text_input(
        "company_url",
        "Company URL",
        "URL of the company you are targeting",
    ));
    body.push('\n');
    body.push_str(&text_input(
        "product_category",
        "Product Category",
        "E.g., Data Warehousing, Cloud Data Platform",
    ));
    body.push('\n');
    body.push_str(&text_area("competitors", "Competitors (URLs)", "Enter one URL per line"));
    body.push('\n');
    body.push_str(&text_input(
        "value_proposition",
        "Value Proposition",
        "Summarize the product's value in one sentence",
    ));
    body.push('\n');
    body.push_str(&text_input(
        "target_customer",
        "Target Customer",
        "Name of the person you are trying to sell to",
    ));
    body.push('\n');
    body.push_str(&text_area(
        "manual_leaders",
        "Known Company Leaders (optional, one per line)",
        "Enter names of key leaders at the prospect company",
    ));
    body.push('\n');
    body.push_str(
        r#"<label for="document">Optional: Upload a product overview sheet or deck</label>
<input type="file" id="document" name="document" accept=".pdf,.docx,.pptx,.txt">
"#,
    );

    if mode == PromptMode::Sectioned {
        body.push_str(
            "<label>Select which sections to include in the one-pager:</label>\n<div class=\"sections\">\n",
        );
        for section in Section::ALL {
            body.push_str(&format!(
                "<label><input type=\"checkbox\" name=\"sections\" value=\"{}\" checked> {}</label>\n",
                section.key(),
                section.title()
            ));
        }
        body.push_str("</div>\n");
    }

    body.push_str("<button type=\"submit\">Generate Insights</button>\n</form>");
    page(&body)
}

/// The results page: every generated section in order, then the competitor
/// mention chart when a Competitor Mentions section exists and competitors
/// were supplied.
pub fn results_page(reports: &[SectionReport], competitors: &[String]) -> String {
    let mut body = String::new();
    body.push_str("<p class=\"success\">Insights generated!</p>\n<hr>\n");
    body.push_str("<h2>Sales Account Insights</h2>\n");

    for report in reports {
        body.push_str(&format!("<h3>{}</h3>\n", encode_text(&report.title)));
        if let Some(caption) = report.caption {
            body.push_str(&format!("<p class=\"caption\">{caption}</p>\n"));
        }
        // Raw model output, rendered as-is.
        body.push_str(&format!("<div class=\"section-body\">{}</div>\n", report.body));
    }

    let mentions = reports
        .iter()
        .find(|r| r.title == Section::CompetitorMentions.title());
    if let Some(report) = mentions {
        if !competitors.is_empty() {
            let counts = count_mentions(&report.body, competitors);
            body.push_str("<h4>Competitor Mention Frequency (in Insights)</h4>\n");
            body.push_str(&bar_chart_svg(&counts));
            body.push('\n');
        }
    }

    body.push_str("<hr>\n<p><a href=\"/\">Back to form</a></p>");
    page(&body)
}

pub fn warning_page(message: &str) -> String {
    page(&format!(
        "<h1>{PAGE_TITLE}</h1>\n<div class=\"warning\">{}</div>\n<p><a href=\"/\">Back to form</a></p>",
        encode_text(message)
    ))
}

pub fn error_page(message: &str) -> String {
    page(&format!(
        "<h1>{PAGE_TITLE}</h1>\n<div class=\"error\">{}</div>\n<p><a href=\"/\">Back to form</a></p>",
        encode_text(message)
    ))
}

const BAR_WIDTH: usize = 60;
const BAR_GAP: usize = 30;
const CHART_HEIGHT: usize = 200;
const MARGIN_LEFT: usize = 40;
const MARGIN_TOP: usize = 16;

/// One bar per competitor, integer y axis, counts printed above the bars.
fn bar_chart_svg(counts: &[(String, usize)]) -> String {
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    let width = MARGIN_LEFT + counts.len() * (BAR_WIDTH + BAR_GAP) + 10;
    let height = MARGIN_TOP + CHART_HEIGHT + 40;

    let mut svg = format!(
        r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg" role="img">"#
    );

    // Integer ticks; thin out when the range is large.
    let step = (max / 5).max(1);
    let mut tick = 0;
    while tick <= max {
        let y = MARGIN_TOP + CHART_HEIGHT - tick * CHART_HEIGHT / max;
        svg.push_str(&format!(
            r##"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="#ddd"/><text x="{tx}" y="{ty}" font-size="11" text-anchor="end" fill="#444">{tick}</text>"##,
            x1 = MARGIN_LEFT,
            x2 = width - 10,
            tx = MARGIN_LEFT - 6,
            ty = y + 4,
        ));
        tick += step;
    }

    for (i, (label, count)) in counts.iter().enumerate() {
        let bar_height = count * CHART_HEIGHT / max;
        let x = MARGIN_LEFT + i * (BAR_WIDTH + BAR_GAP) + BAR_GAP / 2;
        let y = MARGIN_TOP + CHART_HEIGHT - bar_height;
        let label = encode_text(label);
        svg.push_str(&format!(
            r##"<rect x="{x}" y="{y}" width="{BAR_WIDTH}" height="{bar_height}" fill="#1f77b4"/><text x="{cx}" y="{count_y}" font-size="12" text-anchor="middle" fill="#222">{count}</text><text x="{cx}" y="{label_y}" font-size="12" text-anchor="middle" fill="#222">{label}</text>"##,
            cx = x + BAR_WIDTH / 2,
            count_y = y.saturating_sub(5),
            label_y = MARGIN_TOP + CHART_HEIGHT + 18,
        ));
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(title: &str, body: &str) -> SectionReport {
        SectionReport {
            title: title.to_string(),
            caption: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn results_page_shows_text_under_its_heading_only() {
        let reports = vec![report("Competitor Mentions", "stubbed completion text")];
        let html = results_page(&reports, &[]);
        assert!(html.contains("<h3>Competitor Mentions</h3>"));
        assert!(html.contains("stubbed completion text"));
        for other in ["Company Strategy", "Leadership Information", "Product/Strategy Summary"] {
            assert!(!html.contains(&format!("<h3>{other}</h3>")));
        }
    }

    #[test]
    fn model_markup_renders_unescaped() {
        let reports = vec![report("Company Strategy", "<b>bold claim</b>")];
        let html = results_page(&reports, &[]);
        assert!(html.contains("<b>bold claim</b>"));
    }

    #[test]
    fn chart_requires_competitors_and_a_mentions_section() {
        let reports = vec![report("Competitor Mentions", "Acme here")];
        let with = results_page(&reports, &["Acme".to_string()]);
        assert!(with.contains("<svg"));
        assert!(with.contains("Competitor Mention Frequency"));

        let without_competitors = results_page(&reports, &[]);
        assert!(!without_competitors.contains("<svg"));

        let other_sections = vec![report("Company Strategy", "Acme here")];
        let without_mentions = results_page(&other_sections, &["Acme".to_string()]);
        assert!(!without_mentions.contains("<svg"));
    }

    #[test]
    fn chart_labels_are_escaped() {
        let reports = vec![report("Competitor Mentions", "x")];
        let html = results_page(&reports, &["<script>".to_string()]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn bar_chart_handles_all_zero_counts() {
        let svg = bar_chart_svg(&[("Acme".to_string(), 0), ("Globex".to_string(), 0)]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Acme"));
        assert!(svg.contains("Globex"));
    }

    #[test]
    fn form_page_reflects_the_mode() {
        let sectioned = form_page(PromptMode::Sectioned);
        assert!(sectioned.contains("name=\"sections\""));
        assert!(sectioned.contains("value=\"competitor_mentions\""));

        let monolithic = form_page(PromptMode::Monolithic);
        assert!(!monolithic.contains("name=\"sections\""));
        assert!(monolithic.contains("Generate Insights"));
    }

    #[test]
    fn warning_and_error_pages_escape_their_message() {
        let html = warning_page("fill in <b>required</b> fields");
        assert!(html.contains("&lt;b&gt;required&lt;/b&gt;"));
        let html = error_page("boom & gloom");
        assert!(html.contains("boom &amp; gloom"));
    }

    #[test]
    fn caption_is_rendered_when_present() {
        let reports = vec![SectionReport {
            title: "Leadership Information".to_string(),
            caption: Some(Section::LeadershipInfo.caption()),
            body: "names".to_string(),
        }];
        let html = results_page(&reports, &[]);
        assert!(html.contains("class=\"caption\""));
        assert!(html.contains("Key leaders at the prospect company"));
    }
}

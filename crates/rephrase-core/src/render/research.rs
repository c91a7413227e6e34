//! Research reports, rendered through markdown
//!
//! Raw HTML inside server text is escaped by the markdown compiler and
//! unsafe link protocols are dropped, so the output is safe to insert.

use crate::error::ClientError;
use crate::response::{ResearchReport, ResearchResult};
use markdown::{to_html_with_options, Options};

pub fn render_research(report: &ResearchReport) -> Result<String, ClientError> {
    let document = match report {
        ResearchReport::Structured(research) => research_markdown(research),
        ResearchReport::Markdown(markdown) => markdown.clone(),
    };
    let html = markdown_to_html(&document)?;
    Ok(format!(r#"<div class="research-result">{}</div>"#, html))
}

/// Assemble the markdown document for a structured report.
pub fn research_markdown(research: &ResearchResult) -> String {
    let mut doc = format!("# {}\n\n", single_line(&research.topic));

    push_section(&mut doc, "Executive Summary", &research.executive_summary);
    push_section(&mut doc, "Historical Context", &research.historical_context);
    push_list(&mut doc, "Core Concepts", &research.core_concepts);
    push_list(
        &mut doc,
        "Controversies and Critiques",
        &research.controversies_and_critiques,
    );
    push_list(&mut doc, "Practical Applications", &research.practical_applications);

    doc
}

fn push_section(doc: &mut String, heading: &str, body: &str) {
    doc.push_str("## ");
    doc.push_str(heading);
    doc.push_str("\n\n");
    let body = body.trim();
    if !body.is_empty() {
        doc.push_str(body);
        doc.push_str("\n\n");
    }
}

fn push_list(doc: &mut String, heading: &str, items: &[String]) {
    doc.push_str("## ");
    doc.push_str(heading);
    doc.push_str("\n\n");
    let mut wrote_any = false;
    for item in items.iter().map(|item| single_line(item)) {
        if item.is_empty() {
            continue;
        }
        doc.push_str("- ");
        doc.push_str(&item);
        doc.push('\n');
        wrote_any = true;
    }
    if wrote_any {
        doc.push('\n');
    }
}

// Headings and list items end at a newline, so fold embedded ones.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn markdown_to_html(document: &str) -> Result<String, ClientError> {
    to_html_with_options(document, &Options::gfm()).map_err(|e| ClientError::Markdown(e.to_string()))
}

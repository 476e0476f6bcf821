//! Declarative suggestion rendering: payloads are first mapped to a block
//! view-model, and the HTML/plain-text renderers only walk blocks. Keeps the
//! payload-to-markup mapping testable without any live UI.

use serde_json::Value;
use shared::protocol::{AcceptanceTermPayload, DocumentPayload, UserStoryPayload};

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionView {
    pub heading: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A single labeled value line.
    Field { label: String, value: String },
    /// A labeled sequence of short lines (the role/goal/benefit narrative).
    Narrative { label: String, lines: Vec<String> },
    /// The ordered acceptance-criteria scenarios.
    Criteria {
        label: String,
        items: Vec<CriterionView>,
    },
    /// A labeled free-text block rendered verbatim.
    Preformatted { label: String, text: String },
    /// A titled table; cells keep their row order.
    Table {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<Cell>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionView {
    pub scenario: String,
    pub given: String,
    pub when: String,
    pub then: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub preformatted: bool,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preformatted: false,
        }
    }

    fn preformatted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preformatted: true,
        }
    }
}

/// Build the view-model for any document payload.
pub fn suggestion_view(payload: &DocumentPayload) -> SuggestionView {
    match payload {
        DocumentPayload::UserStory(story) => user_story_view(story),
        DocumentPayload::AcceptanceTerm(term) => acceptance_term_view(term),
    }
}

fn user_story_view(story: &UserStoryPayload) -> SuggestionView {
    let criteria = story
        .acceptance_criteria
        .iter()
        .map(|criterion| CriterionView {
            scenario: criterion.scenario.clone(),
            given: criterion.given.clone(),
            when: criterion.when.clone(),
            then: criterion.then.clone(),
        })
        .collect();

    SuggestionView {
        heading: "User Story Suggestion".to_string(),
        blocks: vec![
            Block::Field {
                label: "Requested by".to_string(),
                value: story.requested_by.clone(),
            },
            Block::Field {
                label: "Responsible analyst".to_string(),
                value: story.analyst.clone(),
            },
            Block::Field {
                label: "Use cases".to_string(),
                value: story.use_cases.clone(),
            },
            Block::Narrative {
                label: "User story".to_string(),
                lines: vec![
                    format!("As {}", story.role),
                    format!("I can {}", story.goal),
                    format!("So that {}", story.benefit),
                ],
            },
            Block::Criteria {
                label: "Acceptance criteria".to_string(),
                items: criteria,
            },
            Block::Preformatted {
                label: "TASKS".to_string(),
                text: story.tasks.clone(),
            },
            Block::Preformatted {
                label: "DEPENDENCIES".to_string(),
                text: story.dependencies.clone(),
            },
            Block::Preformatted {
                label: "RISKS".to_string(),
                text: story.risks.clone(),
            },
        ],
    }
}

fn acceptance_term_view(term: &AcceptanceTermPayload) -> SuggestionView {
    let info_rows = term
        .general_info
        .iter()
        .map(|(key, value)| vec![Cell::plain(key.clone()), Cell::plain(value_text(value))])
        .collect();

    let step_rows = term
        .test_steps
        .iter()
        .map(|row| {
            vec![
                Cell::plain(row.step.clone()),
                Cell::plain(row.executor.clone()),
                Cell::plain(row.description.clone()),
                Cell::preformatted(row.expected_result.clone()),
                Cell::plain(row.obtained_result.clone()),
                Cell::plain(row.status.clone()),
                Cell::plain(row.observations.clone()),
            ]
        })
        .collect();

    SuggestionView {
        heading: "Acceptance Term Suggestion".to_string(),
        blocks: vec![
            Block::Table {
                title: "General Information".to_string(),
                headers: vec!["Item".to_string(), "Detail".to_string()],
                rows: info_rows,
            },
            Block::Table {
                title: "Test Steps".to_string(),
                headers: [
                    "Step",
                    "Executed by",
                    "Step Description",
                    "Expected Result",
                    "Obtained Result",
                    "Status",
                    "Observations",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                rows: step_rows,
            },
        ],
    }
}

/// Lenient value display: strings unquoted, anything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render a suggestion as an HTML fragment. Deterministic push-order writer;
/// every payload-derived string goes through [`esc`].
pub fn render_html(view: &SuggestionView) -> String {
    let mut out = String::with_capacity(2 * 1024);
    out.push_str("<h3>");
    out.push_str(&esc(&view.heading));
    out.push_str("</h3>\n");

    for block in &view.blocks {
        match block {
            Block::Field { label, value } => {
                out.push_str("<div class=\"suggestion-field\"><strong>");
                out.push_str(&esc(label));
                out.push_str(":</strong> ");
                out.push_str(&esc(value));
                out.push_str("</div>\n");
            }
            Block::Narrative { label, lines } => {
                out.push_str("<div class=\"suggestion-field\"><strong>");
                out.push_str(&esc(label));
                out.push_str(":</strong>");
                for line in lines {
                    out.push_str("<p>");
                    out.push_str(&esc(line));
                    out.push_str("</p>");
                }
                out.push_str("</div>\n");
            }
            Block::Criteria { label, items } => {
                out.push_str("<div class=\"suggestion-field\"><strong>");
                out.push_str(&esc(label));
                out.push_str(":</strong>");
                for item in items {
                    out.push_str("<div class=\"acceptance-criterion\"><h4>");
                    out.push_str(&esc(&item.scenario));
                    out.push_str("</h4><p><strong>Given</strong> ");
                    out.push_str(&esc(&item.given));
                    out.push_str("</p><p><strong>When</strong> ");
                    out.push_str(&esc(&item.when));
                    out.push_str("</p><p><strong>Then</strong> ");
                    out.push_str(&esc(&item.then));
                    out.push_str("</p></div>");
                }
                out.push_str("</div>\n");
            }
            Block::Preformatted { label, text } => {
                out.push_str("<div class=\"suggestion-field\"><strong>");
                out.push_str(&esc(label));
                out.push_str(":</strong><pre>");
                out.push_str(&esc(text));
                out.push_str("</pre></div>\n");
            }
            Block::Table {
                title,
                headers,
                rows,
            } => {
                out.push_str("<h4>");
                out.push_str(&esc(title));
                out.push_str("</h4>\n<table><thead><tr>");
                for header in headers {
                    out.push_str("<th>");
                    out.push_str(&esc(header));
                    out.push_str("</th>");
                }
                out.push_str("</tr></thead><tbody>");
                for row in rows {
                    out.push_str("<tr>");
                    for cell in row {
                        if cell.preformatted {
                            out.push_str("<td><pre>");
                            out.push_str(&esc(&cell.text));
                            out.push_str("</pre></td>");
                        } else {
                            out.push_str("<td>");
                            out.push_str(&esc(&cell.text));
                            out.push_str("</td>");
                        }
                    }
                    out.push_str("</tr>");
                }
                out.push_str("</tbody></table>\n");
            }
        }
    }

    out
}

/// Render a suggestion as plain text for terminal display.
pub fn render_text(view: &SuggestionView) -> String {
    let mut out = String::new();
    out.push_str(&view.heading);
    out.push('\n');
    out.push_str(&"=".repeat(view.heading.len()));
    out.push('\n');

    for block in &view.blocks {
        match block {
            Block::Field { label, value } => {
                out.push_str(&format!("{label}: {value}\n"));
            }
            Block::Narrative { label, lines } => {
                out.push_str(&format!("{label}:\n"));
                for line in lines {
                    out.push_str(&format!("  {line}\n"));
                }
            }
            Block::Criteria { label, items } => {
                out.push_str(&format!("{label}:\n"));
                for item in items {
                    out.push_str(&format!("  - {}\n", item.scenario));
                    out.push_str(&format!("    Given {}\n", item.given));
                    out.push_str(&format!("    When {}\n", item.when));
                    out.push_str(&format!("    Then {}\n", item.then));
                }
            }
            Block::Preformatted { label, text } => {
                out.push_str(&format!("{label}:\n"));
                for line in text.lines() {
                    out.push_str(&format!("  {line}\n"));
                }
            }
            Block::Table {
                title,
                headers,
                rows,
            } => {
                out.push_str(&format!("{title}:\n"));
                out.push_str(&format!("  {}\n", headers.join(" | ")));
                for row in rows {
                    let cells: Vec<&str> = row.iter().map(|cell| cell.text.as_str()).collect();
                    out.push_str(&format!("  {}\n", cells.join(" | ")));
                }
            }
        }
    }

    out
}

fn esc(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

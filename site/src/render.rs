//! HTML fragments for the trail finder result region.
//!
//! Everything here is a pure function of its input.

use crate::controller::SubmissionState;
use std::fmt;
use trailfinder_core::errors::ErrorKind;
use trailfinder_core::schema::TrailSuggestion;

/// A piece of HTML destined for an output region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFragment(String);

impl DisplayFragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tag-free text for terminals.
    pub fn plain_text(&self) -> String {
        let mut text = String::with_capacity(self.0.len());
        let mut in_tag = false;
        for c in self.0.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }

        unescape_html(&text)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for DisplayFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the result region shows for a given state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub visible: bool,
    pub fragment: Option<DisplayFragment>,
}

/// Escapes text for inclusion in HTML content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn render_suggestion(suggestion: &TrailSuggestion) -> DisplayFragment {
    DisplayFragment(format!(
        r#"<h3>Your AI-Generated Trail:</h3>
<div class="ai-hike-info">
    <div class="info-item"><span class="material-symbols-outlined">signpost</span> {}</div>
    <div class="info-item"><span class="material-symbols-outlined">straighten</span> {}</div>
    <div class="info-item"><span class="material-symbols-outlined">trending_up</span> {}</div>
</div>
<p class="ai-hike-description">{}</p>
<p class="ai-hike-description"><strong>Why it's a great match:</strong> {}</p>"#,
        escape_html(&suggestion.trail_name),
        escape_html(&suggestion.distance),
        escape_html(&suggestion.difficulty),
        escape_html(&suggestion.description),
        escape_html(&suggestion.why_it_matches),
    ))
}

/// The message for a failed submission. Only `EmptySelection` gets its own text.
pub fn render_error(kind: &ErrorKind) -> DisplayFragment {
    match kind {
        ErrorKind::EmptySelection => DisplayFragment::new(
            r#"<h3>Please select some options!</h3>
<p class="ai-hike-description">Choose a difficulty or vibe to get a personalized trail suggestion.</p>"#,
        ),
        _ => DisplayFragment::new(
            r#"<h3>Oops! Something went wrong.</h3>
<p class="ai-hike-description">We couldn't generate a trail for you at the moment. This might be due to a network issue or a problem with the AI service. Please try again in a few moments.</p>"#,
        ),
    }
}

pub fn render_state(state: &SubmissionState) -> ResultView {
    match state {
        SubmissionState::Idle | SubmissionState::Validating | SubmissionState::Loading => {
            ResultView {
                visible: false,
                fragment: None,
            }
        }
        SubmissionState::Success(suggestion) => ResultView {
            visible: true,
            fragment: Some(render_suggestion(suggestion)),
        },
        SubmissionState::Failed(kind) => ResultView {
            visible: true,
            fragment: Some(render_error(kind)),
        },
    }
}

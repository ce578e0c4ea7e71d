// ABOUTME: Prompt templates for LLM interactions loaded at compile time
// ABOUTME: Provides the running-activity analysis prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.

/// Placeholder replaced with the lap list JSON
pub const LAP_LIST_PLACEHOLDER: &str = "{lap_list}";

/// Placeholder replaced with the activity summary JSON
pub const SUMMARY_PLACEHOLDER: &str = "{summary}";

/// Running activity analysis prompt
///
/// Contains the unit conversion rules the model must apply and the
/// four-section report template.
pub const RUNNING_ANALYSIS_PROMPT: &str = include_str!("running_analysis.md");

/// Render the running analysis prompt with the activity data embedded
///
/// Placeholders are only recognised in the template itself; text inside the
/// inserted JSON is copied verbatim.
#[must_use]
pub fn render_running_analysis(lap_list_json: &str, summary_json: &str) -> String {
    let substitutions = [
        (LAP_LIST_PLACEHOLDER, lap_list_json),
        (SUMMARY_PLACEHOLDER, summary_json),
    ];
    let mut rendered = String::with_capacity(
        RUNNING_ANALYSIS_PROMPT.len() + lap_list_json.len() + summary_json.len(),
    );
    let mut rest = RUNNING_ANALYSIS_PROMPT;

    while let Some((at, placeholder, value)) = substitutions
        .iter()
        .filter_map(|&(placeholder, value)| rest.find(placeholder).map(|at| (at, placeholder, value)))
        .min_by_key(|(at, _, _)| *at)
    {
        rendered.push_str(&rest[..at]);
        rendered.push_str(value);
        rest = &rest[at + placeholder.len()..];
    }
    rendered.push_str(rest);

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_placeholders_are_filled() {
        let prompt = render_running_analysis(r#"[{"lapType":2}]"#, r#"{"distance":5000}"#);

        assert!(prompt.contains(r#"Per-kilometre laps: [{"lapType":2}]"#));
        assert!(prompt.contains(r#"Summary: {"distance":5000}"#));
        assert!(!prompt.contains(LAP_LIST_PLACEHOLDER));
        assert!(!prompt.contains(SUMMARY_PLACEHOLDER));
    }

    #[test]
    fn test_placeholder_text_inside_data_is_left_alone() {
        let prompt =
            render_running_analysis(r#"[{"note":"{summary}"}]"#, r#"{"note":"{lap_list}"}"#);

        assert!(prompt.contains(r#"Per-kilometre laps: [{"note":"{summary}"}]"#));
        assert!(prompt.contains(r#"Summary: {"note":"{lap_list}"}"#));
    }
}

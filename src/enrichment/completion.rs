//! Hazard suggestions backed by a black-box text completion service.

use super::{HazardProposal, HazardSuggester, ProductContext};
use crate::core::{Error, HazardCategory, Result};

const SYSTEM_PROMPT: &str = "You are an expert in medical device risk management and ISO14971. \
Provide thorough, professional risk analysis.";

/// Anything that turns a system and user prompt into text.
pub trait CompletionService: Send + Sync {
    fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

pub struct CompletionHazardSuggester<C> {
    service: C,
}

impl<C: CompletionService> CompletionHazardSuggester<C> {
    pub fn new(service: C) -> Self {
        Self { service }
    }
}

impl<C: CompletionService> HazardSuggester for CompletionHazardSuggester<C> {
    fn suggest_hazards(&self, context: &ProductContext) -> Result<Vec<HazardProposal>> {
        let response = self.service.complete(SYSTEM_PROMPT, &build_prompt(context))?;
        parse_proposals(&response)
    }
}

/// ISO 14971 hazard analysis request for `context`.
pub fn build_prompt(context: &ProductContext) -> String {
    let categories = HazardCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| format!("{}. {} hazards", i + 1, category.label()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "As a medical device risk management expert following ISO14971, perform a \
comprehensive hazard analysis for:\n\n\
Product: {product}\n\
Intended Use: {intended_use}\n\
User Groups: {groups}\n\
Use Environment: {environment}\n\n\
Identify potential hazards in these categories:\n{categories}\n\n\
For each identified hazard, provide:\n\
- Hazard description\n\
- Hazardous state\n\
- Sequence of events leading to harm\n\
- Potential harm\n\
- Estimated severity (1-5, Negligible to Catastrophic)\n\
- Estimated probability (1-5, Incredible to Frequent)\n\n\
Format response as JSON array with objects containing: category, hazard_description, \
hazardous_state, sequence_of_events, harm, severity, probability",
        product = context.product_description,
        intended_use = context.intended_use,
        groups = context.user_groups.join(", "),
        environment = context.use_environment,
    )
}

/// Parse a JSON array of proposals, optionally wrapped in a fenced block.
pub fn parse_proposals(response: &str) -> Result<Vec<HazardProposal>> {
    serde_json::from_str(strip_code_fence(response))
        .map_err(|e| Error::Enrichment(format!("malformed hazard proposals: {e}")))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

use crate::assessor::AssessmentInput;

const RISK_NOTE_PROMPT: &str = "\
A monitoring threshold for {{HAZARD_TYPE}} has been exceeded in {{REGION}}.
Metric: {{METRIC}}
Observed value: {{OBSERVED}}
Configured threshold: {{THRESHOLD}}

Write one short paragraph (3-4 sentences) assessing the likely risk to people
and infrastructure in the affected region and recommending an immediate
precaution. Plain text only, no headings or lists.";

/// Render the fixed risk-note prompt for a tripped threshold.
pub fn build_risk_prompt(input: &AssessmentInput) -> String {
    RISK_NOTE_PROMPT
        .replace("{{HAZARD_TYPE}}", &input.hazard_type)
        .replace("{{REGION}}", &input.region)
        .replace("{{METRIC}}", &input.metric)
        .replace("{{OBSERVED}}", &input.observed_value.to_string())
        .replace("{{THRESHOLD}}", &input.threshold_value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_all_five_fields() {
        let input = AssessmentInput {
            hazard_type: "flood".to_string(),
            metric: "rainfall_mm".to_string(),
            observed_value: 130.5,
            threshold_value: 100.0,
            region: "Mombasa".to_string(),
        };
        let prompt = build_risk_prompt(&input);
        assert!(prompt.contains("flood"));
        assert!(prompt.contains("rainfall_mm"));
        assert!(prompt.contains("130.5"));
        assert!(prompt.contains("100"));
        assert!(prompt.contains("Mombasa"));
        assert!(!prompt.contains("{{"), "unreplaced placeholder: {prompt}");
    }
}

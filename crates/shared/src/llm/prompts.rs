pub const HEALTHCARE_SYSTEM_PROMPT: &str = "You are a helpful healthcare assistant. Provide informative but cautious health information, always encouraging proper medical consultation for serious concerns. Never diagnose or prescribe. Include appropriate disclaimers when necessary.";

/// Builds the system instruction, addressing the caller by name when one is known.
pub fn system_prompt_for(display_name: Option<&str>) -> String {
    match display_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!(
            "{HEALTHCARE_SYSTEM_PROMPT} You are speaking with {name}; address them by name when it feels natural."
        ),
        None => HEALTHCARE_SYSTEM_PROMPT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{HEALTHCARE_SYSTEM_PROMPT, system_prompt_for};

    #[test]
    fn names_the_caller_when_known() {
        let prompt = system_prompt_for(Some("Dana"));
        assert!(prompt.starts_with(HEALTHCARE_SYSTEM_PROMPT));
        assert!(prompt.contains("speaking with Dana"));
    }

    #[test]
    fn blank_names_fall_back_to_base_prompt() {
        assert_eq!(system_prompt_for(Some("   ")), HEALTHCARE_SYSTEM_PROMPT);
        assert_eq!(system_prompt_for(None), HEALTHCARE_SYSTEM_PROMPT);
    }
}

pub const DISCLAIMER: &str = "Disclaimer: This information is for general educational purposes only and is not a substitute for professional medical advice. Please consult a qualified healthcare provider for diagnosis and treatment.";

pub const FALLBACK_RESPONSE: &str = "I'm sorry, I don't have specific information about that health topic. For accurate medical advice, please consult with a healthcare professional. Would you like to ask about another health topic?";

/// Appends the disclaimer as its own trailing paragraph.
pub fn with_disclaimer(text: &str) -> String {
    format!("{}\n\n{DISCLAIMER}", text.trim_end())
}

pub fn mentions_disclaimer(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("disclaimer") || lower.contains("consult")
}

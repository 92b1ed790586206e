use super::disclaimer::DISCLAIMER;

pub const TOPIC_LISTING_TRIGGERS: &[&str] = &[
    "what can you help with",
    "what topics",
    "what do you know about",
];

const LISTING_INTRO: &str = "I can share general information about the following health topics:";
const LISTING_OUTRO: &str = "Ask me about any of these, or describe what you are experiencing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

const CATEGORIES: &[TopicCategory] = &[
    TopicCategory {
        name: "common conditions",
        keywords: &["headache", "cold", "fever", "allergy"],
    },
    TopicCategory {
        name: "chronic conditions",
        keywords: &["diabetes", "blood pressure"],
    },
    TopicCategory {
        name: "mental health",
        keywords: &["anxiety", "depression", "stress", "sleep"],
    },
    TopicCategory {
        name: "healthy living",
        keywords: &["nutrition", "exercise"],
    },
];

pub fn categories() -> &'static [TopicCategory] {
    CATEGORIES
}

pub fn is_topic_listing_request(query: &str) -> bool {
    let normalized = query.to_lowercase();
    TOPIC_LISTING_TRIGGERS
        .iter()
        .any(|trigger| normalized.contains(trigger))
}

pub fn render_topic_listing() -> String {
    let lines = CATEGORIES
        .iter()
        .map(|category| {
            let keywords = category
                .keywords
                .iter()
                .map(|keyword| title_case(keyword))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {keywords}", title_case(category.name))
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{LISTING_INTRO}\n\n{lines}\n\n{LISTING_OUTRO}\n\n{DISCLAIMER}")
}

pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Healthcare query responder: canned knowledge, topic listing, bounded
//! per-caller history and LLM fallback.

mod conversation;
mod disclaimer;
mod knowledge_base;
mod responder;
mod topics;

pub use conversation::{
    ConversationExchange, ConversationLimits, ConversationStore, ConversationTurn, TurnRole,
};
pub use disclaimer::{DISCLAIMER, FALLBACK_RESPONSE, mentions_disclaimer, with_disclaimer};
pub use knowledge_base::{KnowledgeEntry, entries as knowledge_entries, lookup};
pub use responder::{HealthQueryResponder, ResponderSettings};
pub use topics::{
    TOPIC_LISTING_TRIGGERS, TopicCategory, categories as topic_categories,
    is_topic_listing_request, render_topic_listing, title_case,
};

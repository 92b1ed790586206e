use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::conversation::{ConversationStore, ConversationTurn, TurnRole};
use super::disclaimer::{FALLBACK_RESPONSE, mentions_disclaimer, with_disclaimer};
use super::knowledge_base;
use super::topics::{is_topic_listing_request, render_topic_listing};
use crate::identity::IdentityResolver;
use crate::llm::{
    ChatCompletionRequest, ChatMessage, LlmGateway, complete_with_telemetry, system_prompt_for,
};

#[derive(Debug, Clone, Copy)]
pub struct ResponderSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub llm_timeout: Duration,
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            llm_timeout: Duration::from_secs(20),
        }
    }
}

/// Answers free-text health questions.
///
/// Precedence is fixed: a topic-listing request wins over a knowledge-base
/// keyword, which wins over delegating to the language model. Without a
/// configured gateway, or when the gateway fails, the caller gets
/// [`FALLBACK_RESPONSE`] and their history is left untouched.
#[derive(Clone)]
pub struct HealthQueryResponder {
    conversations: ConversationStore,
    llm_gateway: Option<Arc<dyn LlmGateway>>,
    identities: Option<Arc<dyn IdentityResolver>>,
    settings: ResponderSettings,
}

impl HealthQueryResponder {
    pub fn new(conversations: ConversationStore, settings: ResponderSettings) -> Self {
        Self {
            conversations,
            llm_gateway: None,
            identities: None,
            settings,
        }
    }

    pub fn with_llm_gateway(mut self, llm_gateway: Arc<dyn LlmGateway>) -> Self {
        self.llm_gateway = Some(llm_gateway);
        self
    }

    pub fn with_identity_resolver(mut self, identities: Arc<dyn IdentityResolver>) -> Self {
        self.identities = Some(identities);
        self
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub async fn respond(&self, query: &str, caller_id: Option<&str>) -> String {
        if is_topic_listing_request(query) {
            debug!(path = "topic_listing", "health query answered");
            return render_topic_listing();
        }

        if let Some(entry) = knowledge_base::lookup(query) {
            debug!(
                path = "knowledge_base",
                keyword = entry.keyword,
                "health query answered"
            );
            if let Some(caller_id) = caller_id {
                self.conversations
                    .append(caller_id, query, entry.response)
                    .await;
            }
            return with_disclaimer(entry.response);
        }

        let Some(llm_gateway) = self.llm_gateway.as_deref() else {
            debug!(path = "no_llm_configured", "health query answered");
            return FALLBACK_RESPONSE.to_string();
        };

        let Some(caller_id) = caller_id else {
            return self
                .delegate(llm_gateway, query, None, &[])
                .await
                .map(|reply| finalize_reply(&reply))
                .unwrap_or_else(|| FALLBACK_RESPONSE.to_string());
        };

        // Held until the reply is recorded so a caller's exchanges never interleave.
        let mut exchange = self.conversations.begin_exchange(caller_id).await;
        let Some(reply) = self
            .delegate(llm_gateway, query, Some(caller_id), exchange.turns())
            .await
        else {
            return FALLBACK_RESPONSE.to_string();
        };

        let final_text = finalize_reply(&reply);
        exchange.record(query, reply);
        final_text
    }

    async fn delegate(
        &self,
        llm_gateway: &dyn LlmGateway,
        query: &str,
        caller_id: Option<&str>,
        history: &[ConversationTurn],
    ) -> Option<String> {
        let display_name = self.resolve_display_name(caller_id).await;
        let request = self.build_request(query, caller_id, display_name.as_deref(), history);

        let (result, telemetry) =
            complete_with_telemetry(llm_gateway, request, self.settings.llm_timeout).await;
        telemetry.log(caller_id);

        match result {
            Ok(response) if !response.content.trim().is_empty() => {
                debug!(path = "llm", "health query answered");
                Some(response.content)
            }
            Ok(_) => {
                warn!(
                    caller = caller_id.unwrap_or("anonymous"),
                    "llm returned an empty reply; using fallback response"
                );
                None
            }
            Err(err) => {
                warn!(
                    caller = caller_id.unwrap_or("anonymous"),
                    "llm request failed; using fallback response: {err}"
                );
                None
            }
        }
    }

    fn build_request(
        &self,
        query: &str,
        caller_id: Option<&str>,
        display_name: Option<&str>,
        history: &[ConversationTurn],
    ) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_prompt_for(display_name)));
        messages.extend(history.iter().map(|turn| match turn.role {
            TurnRole::User => ChatMessage::user(turn.content.clone()),
            TurnRole::Assistant => ChatMessage::assistant(turn.content.clone()),
        }));
        messages.push(ChatMessage::user(query));

        let request = ChatCompletionRequest::new(
            messages,
            self.settings.max_tokens,
            self.settings.temperature,
        );
        match caller_id {
            Some(caller_id) => request.with_requester_id(caller_id),
            None => request,
        }
    }

    async fn resolve_display_name(&self, caller_id: Option<&str>) -> Option<String> {
        let (Some(identities), Some(caller_id)) = (self.identities.as_deref(), caller_id) else {
            return None;
        };

        match identities.display_name(caller_id).await {
            Ok(display_name) => display_name,
            Err(err) => {
                warn!(caller = caller_id, "display name lookup failed: {err}");
                None
            }
        }
    }
}

fn finalize_reply(reply: &str) -> String {
    if mentions_disclaimer(reply) {
        reply.to_string()
    } else {
        with_disclaimer(reply)
    }
}

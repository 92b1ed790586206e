use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::{ChatCompletionRequest, ChatCompletionResponse, LlmGateway, LlmGatewayError};

#[derive(Debug, Clone)]
pub struct LlmTelemetryEvent {
    pub outcome: &'static str,
    pub latency_ms: u64,
    pub message_count: usize,
    pub model: Option<String>,
    pub provider_request_id: Option<String>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub error_type: Option<&'static str>,
}

impl LlmTelemetryEvent {
    pub fn log(&self, caller: Option<&str>) {
        let caller = caller.unwrap_or("anonymous");
        if self.error_type.is_some() {
            warn!(
                caller,
                outcome = self.outcome,
                latency_ms = self.latency_ms,
                message_count = self.message_count,
                error_type = self.error_type,
                "llm chat completion failed"
            );
        } else {
            info!(
                caller,
                outcome = self.outcome,
                latency_ms = self.latency_ms,
                message_count = self.message_count,
                model = self.model.as_deref(),
                provider_request_id = self.provider_request_id.as_deref(),
                prompt_tokens = self.prompt_tokens,
                completion_tokens = self.completion_tokens,
                total_tokens = self.total_tokens,
                "llm chat completion succeeded"
            );
        }
    }
}

/// Runs a single completion attempt bounded by `timeout` and reports how it went.
pub async fn complete_with_telemetry(
    llm_gateway: &dyn LlmGateway,
    request: ChatCompletionRequest,
    timeout: Duration,
) -> (
    Result<ChatCompletionResponse, LlmGatewayError>,
    LlmTelemetryEvent,
) {
    let message_count = request.messages.len();
    let started_at = Instant::now();
    let result = match tokio::time::timeout(timeout, llm_gateway.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(LlmGatewayError::Timeout),
    };
    let telemetry = telemetry_for_result(started_at.elapsed(), message_count, &result);
    (result, telemetry)
}

fn telemetry_for_result(
    latency: Duration,
    message_count: usize,
    result: &Result<ChatCompletionResponse, LlmGatewayError>,
) -> LlmTelemetryEvent {
    let latency_ms = duration_to_millis(latency);
    match result {
        Ok(response) => {
            let usage = response.usage.as_ref();
            LlmTelemetryEvent {
                outcome: "success",
                latency_ms,
                message_count,
                model: Some(response.model.clone()),
                provider_request_id: response.provider_request_id.clone(),
                prompt_tokens: usage.map(|usage| usage.prompt_tokens),
                completion_tokens: usage.map(|usage| usage.completion_tokens),
                total_tokens: usage.map(|usage| usage.total_tokens),
                error_type: None,
            }
        }
        Err(err) => LlmTelemetryEvent {
            outcome: "failure",
            latency_ms,
            message_count,
            model: None,
            provider_request_id: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            error_type: Some(error_type(err)),
        },
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn error_type(error: &LlmGatewayError) -> &'static str {
    match error {
        LlmGatewayError::Timeout => "timeout",
        LlmGatewayError::ProviderFailure(_) => "provider_failure",
        LlmGatewayError::InvalidProviderPayload(_) => "invalid_provider_payload",
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::complete_with_telemetry;
    use crate::llm::{
        ChatCompletionRequest, ChatCompletionResponse, ChatMessage, LlmGateway, LlmGatewayError,
        LlmGatewayFuture, LlmTokenUsage,
    };

    struct SlowGateway;

    impl LlmGateway for SlowGateway {
        fn complete<'a>(&'a self, _request: ChatCompletionRequest) -> LlmGatewayFuture<'a> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Err(LlmGatewayError::ProviderFailure("unreachable".to_string()))
            })
        }
    }

    struct InstantGateway;

    impl LlmGateway for InstantGateway {
        fn complete<'a>(&'a self, _request: ChatCompletionRequest) -> LlmGatewayFuture<'a> {
            Box::pin(async move {
                Ok(ChatCompletionResponse {
                    model: "gpt-test".to_string(),
                    provider_request_id: Some("req-1".to_string()),
                    content: "Drink water.".to_string(),
                    usage: Some(LlmTokenUsage {
                        prompt_tokens: 10,
                        completion_tokens: 3,
                        total_tokens: 13,
                    }),
                })
            })
        }
    }

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest::new(vec![ChatMessage::user("hello")], 500, 0.7)
    }

    #[tokio::test]
    async fn elapsed_timeout_is_reported_as_timeout() {
        let (result, telemetry) =
            complete_with_telemetry(&SlowGateway, request(), Duration::from_millis(20)).await;

        assert!(matches!(result, Err(LlmGatewayError::Timeout)));
        assert_eq!(telemetry.outcome, "failure");
        assert_eq!(telemetry.error_type, Some("timeout"));
    }

    #[tokio::test]
    async fn success_carries_model_and_usage() {
        let (result, telemetry) =
            complete_with_telemetry(&InstantGateway, request(), Duration::from_secs(1)).await;

        assert_eq!(result.expect("completion should succeed").content, "Drink water.");
        assert_eq!(telemetry.outcome, "success");
        assert_eq!(telemetry.model.as_deref(), Some("gpt-test"));
        assert_eq!(telemetry.total_tokens, Some(13));
        assert_eq!(telemetry.message_count, 1);
    }
}

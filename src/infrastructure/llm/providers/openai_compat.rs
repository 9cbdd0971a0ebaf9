//! Wire format shared by OpenAI-compatible chat completion APIs

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::{LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage};

/// API request structure
#[derive(Serialize)]
pub(super) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search_options: Option<WebSearchOptions>,
}

#[derive(Serialize)]
pub(super) struct WebSearchOptions {
    pub search_context_size: &'static str,
}

/// API response structure
#[derive(Deserialize, Debug)]
pub(super) struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// Choice in response
#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

/// Response message
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Usage information
#[derive(Deserialize, Debug)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// First choice's text; empty when the provider sent none
pub(super) fn into_response(chat_response: ChatResponse, model: &str) -> LLMResponse {
    let usage = chat_response.usage.map(|u| LLMUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    let (content, finish_reason) = chat_response
        .choices
        .into_iter()
        .next()
        .map(|choice| (choice.message.content.unwrap_or_default(), choice.finish_reason))
        .unwrap_or_default();

    LLMResponse {
        content,
        model: model.to_string(),
        usage,
        finish_reason,
    }
}

/// POST a chat completion and unwrap the first choice
pub(super) async fn chat_completion(
    client: &Client,
    url: &str,
    api_key: &str,
    request: &ChatRequest<'_>,
) -> LLMResult<LLMResponse> {
    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .map_err(|e| LLMError::NetworkError(e.to_string()))?;

    if response.status() == 429 {
        return Err(LLMError::RateLimited);
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
    }

    let chat_response: ChatResponse = response
        .json()
        .await
        .map_err(|e| LLMError::ParseError(e.to_string()))?;

    Ok(into_response(chat_response, request.model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response() {
        let body = r#"{
            "id": "chatcmpl-1", "object": "chat.completion", "created": 1,
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}
        }"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        let response = into_response(chat, "gpt-4o");

        assert_eq!(response.content, "Hello");
        assert_eq!(response.model, "gpt-4o");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, Some(6));
    }

    #[test]
    fn test_missing_content_is_empty() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": null}]}"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(into_response(chat, "m").content, "");

        let chat: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(into_response(chat, "m").content, "");
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let messages = vec![LLMMessage::user("Hi")];
        let request = ChatRequest {
            model: "sonar",
            messages: &messages,
            temperature: None,
            max_tokens: Some(10),
            web_search_options: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "sonar", "messages": [{"role": "user", "content": "Hi"}], "max_tokens": 10})
        );
    }
}

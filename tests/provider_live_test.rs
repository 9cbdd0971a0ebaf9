//! Live provider tests. They need real API keys and network access.
//! Run with: cargo test --test provider_live_test -- --ignored

use std::sync::Once;

use geo_tracker::application::signals::extract_signals;
use geo_tracker::domain::entities::ProviderKind;
use geo_tracker::infrastructure::llm::{HttpProviderFactory, LLMConfig, ProviderFactory};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

fn key_for(kind: ProviderKind) -> String {
    LLMConfig::from_env()
        .api_key(kind)
        .map(str::to_string)
        .unwrap_or_else(|| panic!("API key for {} must be set in environment", kind))
}

/// OpenAI keys start with "sk-"
#[test]
#[ignore]
fn test_openai_api_key_format() {
    ensure_init();

    let api_key = key_for(ProviderKind::OpenAI);
    assert!(api_key.starts_with("sk-"), "OPENAI_API_KEY should start with 'sk-'");
    assert!(api_key.len() > 20, "OPENAI_API_KEY should be reasonably long");
}

#[tokio::test]
#[ignore]
async fn test_openai_query() {
    ensure_init();

    let provider = HttpProviderFactory.create(ProviderKind::OpenAI, &key_for(ProviderKind::OpenAI));
    let reply = provider
        .query("Reply with exactly: 'LLM test passed'", "gpt-4o-mini")
        .await
        .expect("Should query OpenAI");

    assert!(reply.to_lowercase().contains("llm test passed"), "Unexpected reply: {}", reply);
}

#[tokio::test]
#[ignore]
async fn test_search_model_cites_urls() {
    ensure_init();

    let provider = HttpProviderFactory.create(ProviderKind::OpenAI, &key_for(ProviderKind::OpenAI));
    let reply = provider
        .query("What is the official website of the Rust programming language? Cite it.", "gpt-4o-search-preview")
        .await
        .expect("Should query search model");

    let signal = extract_signals(&reply, "rust-lang.org");
    assert!(signal.mentioned, "Reply should mention rust-lang.org: {}", reply);
}

#[tokio::test]
#[ignore]
async fn test_connection_checks() {
    ensure_init();

    for kind in ProviderKind::ALL {
        let provider = HttpProviderFactory.create(kind, &key_for(kind));
        assert!(provider.test_connection().await, "{} key should be accepted", kind);
    }
}

/// Invalid keys are reported as a failed check, never as an error
#[tokio::test]
#[ignore]
async fn test_invalid_api_key_rejected() {
    ensure_init();

    for kind in ProviderKind::ALL {
        let provider = HttpProviderFactory.create(kind, "invalid_key_12345");
        assert!(!provider.test_connection().await, "{} should reject an invalid key", kind);
    }
}

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use content_studio::config::Credentials;
use content_studio::context::CompanyContext;
use content_studio::errors::{ComposeError, ProviderError};
use content_studio::export;
use content_studio::provider::{GenerationClient, Provider};
use content_studio::registry::Registry;
use content_studio::session::Session;
use content_studio::wire::{
    FailureKind, GenerationRequest, GenerationResult, Limits, SocialPostRequest,
};
use pretty_assertions::assert_eq;

/// Replies with a fixed outcome and remembers the keys it was called with.
struct FakeProvider {
    reply: Result<String, ProviderError>,
    seen_keys: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Provider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn complete(
        &self,
        _prompt: &str,
        api_key: &str,
        _limits: &Limits,
    ) -> Result<String, ProviderError> {
        self.seen_keys.lock().unwrap().push(api_key.to_string());
        self.reply.clone()
    }
}

fn client(reply: Result<String, ProviderError>) -> (GenerationClient, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeProvider { reply, seen_keys: seen.clone() };
    (GenerationClient::new(Box::new(fake)), seen)
}

fn session(key: &str) -> Session<'static> {
    Session::new(
        Registry::builtin().unwrap(),
        CompanyContext::unconfigured(),
        Credentials::new(key),
        Limits { model: "test-model".into(), max_tokens: 256 },
    )
}

fn request(topic: &str) -> GenerationRequest {
    GenerationRequest::SocialPost(SocialPostRequest {
        platform: "Twitter/X".into(),
        content_type: "Tips & Best Practices".into(),
        tone: "Friendly".into(),
        persona: Some("Solo Practitioner".into()),
        topic: topic.into(),
        audience: String::new(),
        additional_context: String::new(),
    })
}

fn failure_kind(result: &GenerationResult) -> Option<FailureKind> {
    result.failure().map(|f| f.kind)
}

#[tokio::test]
async fn auth_failure_is_classified_and_recorded() {
    let (client, _) = client(Err(ProviderError::Unauthorized("invalid x-api-key".into())));
    let mut s = session("sk-bad");

    let entry = s.submit(&client, &request("deadlines")).await.unwrap().clone();
    assert_eq!(failure_kind(&entry.result), Some(FailureKind::InvalidCredentials));
    assert!(entry.result.failure().unwrap().message.contains("invalid x-api-key"));

    assert_eq!(s.history().len(), 1);
    assert_eq!(s.history().list_all()[0].request.topic, "deadlines");
}

#[tokio::test]
async fn unclassified_error_becomes_transient() {
    let (client, _) = client(Err(ProviderError::Other(String::new())));
    let mut s = session("sk-ok");
    let entry = s.submit(&client, &request("x")).await.unwrap();
    let failure = entry.result.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::TransientServiceError);
    assert!(!failure.message.trim().is_empty());
}

#[tokio::test]
async fn rate_limit_is_classified() {
    let (client, _) = client(Err(ProviderError::RateLimited("slow down".into())));
    let mut s = session("sk-ok");
    let entry = s.submit(&client, &request("x")).await.unwrap();
    assert_eq!(failure_kind(&entry.result), Some(FailureKind::RateLimited));
}

#[tokio::test]
async fn empty_text_is_not_success() {
    let (client, _) = client(Ok("  \n".into()));
    let mut s = session("sk-ok");
    let entry = s.submit(&client, &request("x")).await.unwrap();
    assert_eq!(failure_kind(&entry.result), Some(FailureKind::TransientServiceError));
}

#[tokio::test]
async fn missing_key_fails_without_calling_service() {
    let (client, seen) = client(Ok("never".into()));
    let mut s = session("");
    let entry = s.submit(&client, &request("x")).await.unwrap();
    assert_eq!(failure_kind(&entry.result), Some(FailureKind::InvalidCredentials));
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(s.history().len(), 1);
}

#[tokio::test]
async fn compose_error_never_reaches_client() {
    let (client, seen) = client(Ok("never".into()));
    let mut s = session("sk-ok");
    let err = s.submit(&client, &request("")).await.unwrap_err();
    assert_eq!(err, ComposeError::MissingRequiredField("topic".into()));
    assert!(seen.lock().unwrap().is_empty());
    assert!(s.history().is_empty());
}

#[tokio::test]
async fn override_replaces_startup_key() {
    let (client, seen) = client(Ok("post".into()));
    let mut s = session("sk-startup");
    s.submit(&client, &request("a")).await.unwrap();
    s.override_api_key("sk-override");
    s.submit(&client, &request("b")).await.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["sk-startup".to_string(), "sk-override".to_string()]);
}

#[tokio::test]
async fn history_keeps_order_and_clears() {
    let (client, _) = client(Ok("Generated post".into()));
    let mut s = session("sk-ok");
    for topic in ["first", "second", "third"] {
        s.submit(&client, &request(topic)).await.unwrap();
    }
    let topics: Vec<_> = s.history().list_all().iter().map(|e| e.request.topic.clone()).collect();
    assert_eq!(topics, vec!["first", "second", "third"]);

    s.clear_history();
    assert!(s.history().list_all().is_empty());

    // still usable after clearing
    s.submit(&client, &request("fourth")).await.unwrap();
    assert_eq!(s.history().len(), 1);
}

#[tokio::test]
async fn exports_successful_result_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let (ok_client, _) = client(Ok("Deadline tips for solo firms".into()));
    let (bad_client, _) = client(Err(ProviderError::Other("boom".into())));
    let mut s = session("sk-ok");

    let ok = s.submit(&ok_client, &request("deadlines")).await.unwrap().clone();
    let path = export::save_result(dir.path(), &ok).unwrap().unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("twitter_x_tips_best_practices_"), "{name}");
    assert!(name.ends_with(".txt"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Deadline tips for solo firms");

    // a second export in the same minute gets its own file
    let again = export::save_result(dir.path(), &ok).unwrap().unwrap();
    assert!(again != path);

    let failed = s.submit(&bad_client, &request("outage")).await.unwrap().clone();
    assert!(export::save_result(dir.path(), &failed).unwrap().is_none());

    let history_path = export::save_history(dir.path(), s.history(), chrono::Local::now()).unwrap();
    let body = std::fs::read_to_string(history_path).unwrap();
    assert!(body.contains("=== 1. Social Media - Twitter/X - Tips & Best Practices - deadlines"));
    assert!(body.contains("Deadline tips for solo firms"));
    assert!(body.contains("=== 2. Social Media - Twitter/X"));
    assert!(body.contains("Generation failed: boom"));
}

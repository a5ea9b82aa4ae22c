use super::*;
use async_trait::async_trait;
use serde_json::json;

use zegoop_protocols::{
    CompletionRequest, CompletionResponse, LLMProvider, ProviderError, RequestType, SettingsMap,
};

use crate::registry::{ProviderRegistry, SurfaceRegistry};
use crate::store::MemorySettingsStore;

struct PanickingProvider;

#[async_trait]
impl LLMProvider for PanickingProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        "broken"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        panic!("vendor adapter exploded")
    }
}

fn coordinator(initial: serde_json::Value) -> Arc<Coordinator> {
    let data: SettingsMap = initial.as_object().cloned().unwrap();
    let providers = Arc::new(ProviderRegistry::new());
    providers.register(Arc::new(PanickingProvider)).unwrap();
    Arc::new(Coordinator::new(
        Arc::new(MemorySettingsStore::with_data(data)),
        providers,
        Arc::new(SurfaceRegistry::new()),
    ))
}

#[tokio::test]
async fn test_request_reply_through_mailbox() {
    let (service, handle) = CoordinatorService::new(coordinator(json!({ "aiMode": false })));
    service.spawn();

    let reply = handle.request(None, Command::ToggleMode).await.unwrap();
    assert_eq!(reply, Reply::mode(true));
}

#[tokio::test]
async fn test_client_sends_as_origin() {
    let (service, handle) = CoordinatorService::new(coordinator(json!({})));
    service.spawn();

    let client = handle.client("popup");
    assert_eq!(client.origin(), "popup");
    let reply = client.request(Command::GetSettings).await.unwrap();
    assert!(matches!(reply, Reply::Settings(_)));
}

#[tokio::test]
async fn test_panicking_handler_still_replies() {
    let (service, handle) = CoordinatorService::new(coordinator(json!({
        "selectedLLM": "openai",
        "apiKeys": { "openai": "sk-test" }
    })));
    service.spawn();

    let reply = handle
        .request(
            Some("tab-1".to_string()),
            Command::ProcessText {
                text: "boom".to_string(),
                request_type: RequestType::Explain,
            },
        )
        .await
        .unwrap();

    let message = reply.error_message().unwrap();
    assert!(message.contains("vendor adapter exploded"));

    // The service keeps serving after a panic.
    let reply = handle.request(None, Command::GetSettings).await.unwrap();
    assert!(!reply.is_error());
}

#[tokio::test]
async fn test_commands_are_served_concurrently() {
    let (service, handle) = CoordinatorService::new(coordinator(json!({ "aiMode": false })));
    service.spawn();

    let requests = (0..8).map(|_| handle.request(None, Command::GetSettings));
    let replies = futures::future::join_all(requests).await;
    assert!(replies.iter().all(|r| matches!(r, Ok(Reply::Settings(_)))));
}

#[tokio::test]
async fn test_closed_mailbox() {
    let (service, handle) = CoordinatorService::new(coordinator(json!({})));
    drop(service);

    let result = handle.request(None, Command::GetSettings).await;
    assert!(matches!(result, Err(SurfaceError::CoordinatorUnavailable(_))));
}

#[tokio::test]
async fn test_menu_click_reaches_coordinator() {
    let coordinator = coordinator(json!({ "aiMode": false }));
    let (service, handle) = CoordinatorService::new(coordinator.clone());
    service.spawn();

    handle
        .menu_click("tab-1".to_string(), MenuItem::ToggleMode, None)
        .await
        .unwrap();

    // Wait for the spawned handler to persist the flip.
    let store_mode = async {
        loop {
            let settings = coordinator.settings().await.unwrap();
            if settings.get("aiMode") == Some(&json!(true)) {
                break;
            }
            tokio::task::yield_now().await;
        }
    };
    tokio::time::timeout(std::time::Duration::from_secs(5), store_mode)
        .await
        .unwrap();
}

#[test]
fn test_panic_message() {
    let boxed: Box<dyn Any + Send> = Box::new("static message");
    assert_eq!(panic_message(&*boxed), "static message");
    let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
    assert_eq!(panic_message(&*boxed), "owned");
    let boxed: Box<dyn Any + Send> = Box::new(42u8);
    assert_eq!(panic_message(&*boxed), "handler panicked");
}

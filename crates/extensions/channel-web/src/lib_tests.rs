use super::*;
use zegoop_core::{Coordinator, CoordinatorService, MemorySettingsStore, ProviderRegistry};

fn channel(config: WebChannelConfig) -> WebChannel {
    let surfaces = Arc::new(SurfaceRegistry::new());
    let coordinator = Arc::new(Coordinator::new(
        Arc::new(MemorySettingsStore::new()),
        Arc::new(ProviderRegistry::new()),
        surfaces.clone(),
    ));
    let (_service, handle) = CoordinatorService::new(coordinator);
    WebChannel::new(config, handle, surfaces)
}

#[test]
fn test_web_channel_config_default() {
    let config = WebChannelConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8765);
}

#[test]
fn test_web_channel_config_deserialization() {
    let config: WebChannelConfig = serde_json::from_str(r#"{"port":9000}"#).unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9000);
}

#[test]
fn test_web_channel_creation() {
    let channel = channel(WebChannelConfig::default());
    assert_eq!(channel.address(), "127.0.0.1:8765");
    assert!(!channel.is_started());
    assert_eq!(channel.connection_count(), 0);
}

#[tokio::test]
async fn test_start_with_invalid_address() {
    let channel = channel(WebChannelConfig {
        host: "not a host".to_string(),
        port: 1,
    });
    let result = channel.start().await;
    assert!(matches!(result, Err(ChannelError::ConnectionFailed(_))));
}

#[tokio::test]
async fn test_start_and_stop() {
    let channel = channel(WebChannelConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    });
    let addr = channel.start().await.unwrap();
    assert_ne!(addr.port(), 0);
    assert!(channel.is_started());

    channel.stop().await;
    assert!(!channel.is_started());
}

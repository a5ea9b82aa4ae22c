use super::*;
use serde_json::json;
use tokio::time::Instant;

use zegoop_protocols::{Surface, SurfaceError, SurfaceKind};

use crate::channel::ChannelSurface;
use crate::testing::{RecordingView, ScriptedClient};

struct Harness {
    controller: ContentController,
    rx: mpsc::Receiver<ContentEvent>,
    client: Arc<ScriptedClient>,
    view: Arc<RecordingView<ContentUpdate>>,
}

impl Harness {
    async fn start(client: ScriptedClient) -> Self {
        let client = Arc::new(client);
        let view = RecordingView::<ContentUpdate>::new();
        let (controller, rx) =
            ContentController::new(client.clone(), view.clone(), ContentTimings::default());
        let mut harness = Self {
            controller: controller.with_viewport(Viewport::new(1000.0, 700.0)),
            rx,
            client,
            view,
        };
        harness.controller.init().await;
        harness.view.clear();
        harness
    }

    async fn with_settings(settings: Value) -> Self {
        Self::start(ScriptedClient::with_settings(settings)).await
    }

    async fn send(&mut self, event: ContentEvent) {
        self.controller.dispatch(event).await;
    }

    /// Handle mailbox events for `duration` of (paused) time.
    async fn pump_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            tokio::select! {
                Some(event) = self.rx.recv() => self.controller.dispatch(event).await,
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
    }

    fn updates(&self) -> Vec<ContentUpdate> {
        self.view.updates()
    }
}

fn ai_settings() -> Value {
    json!({
        "aiMode": true,
        "selectedLLM": "openai",
        "settings": { "showTooltips": true }
    })
}

fn define_client(answer: &'static str) -> ScriptedClient {
    ScriptedClient::new(move |command| match command {
        Command::GetSettings => Ok(Reply::Settings(ai_settings().as_object().cloned().unwrap())),
        Command::ProcessText { .. } => Ok(Reply::completion(answer)),
        _ => Ok(Reply::ack()),
    })
}

fn hover(word: &str) -> ContentEvent {
    ContentEvent::Hover {
        word: word.to_string(),
        at: Point::new(100.0, 200.0),
    }
}

fn processed_texts(client: &ScriptedClient) -> Vec<(String, RequestType)> {
    client
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::ProcessText { text, request_type } => Some((text, request_type)),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_init_loads_mode() {
    let h = Harness::with_settings(ai_settings()).await;
    assert!(h.controller.ai_mode());
    assert_eq!(h.client.count("getSettings"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hover_lookup_fires_after_delay() {
    let mut h = Harness::start(define_client("Present everywhere.")).await;
    h.send(hover("ubiquitous")).await;

    h.pump_for(Duration::from_millis(799)).await;
    assert!(processed_texts(&h.client).is_empty());

    h.pump_for(Duration::from_millis(2)).await;
    assert_eq!(
        processed_texts(&h.client),
        vec![("ubiquitous".to_string(), RequestType::Tooltip)]
    );
    assert_eq!(
        h.updates(),
        vec![
            ContentUpdate::TooltipLoading {
                word: "ubiquitous".to_string(),
                at: Point::new(110.0, 160.0),
            },
            ContentUpdate::TooltipShown {
                word: "ubiquitous".to_string(),
                definition: "Present everywhere.".to_string(),
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_word_change_restarts_debounce() {
    let mut h = Harness::start(define_client("ok")).await;
    h.send(hover("alpha")).await;
    h.pump_for(Duration::from_millis(500)).await;
    h.send(hover("bravo")).await;

    h.pump_for(Duration::from_millis(500)).await;
    assert!(processed_texts(&h.client).is_empty());

    h.pump_for(Duration::from_millis(400)).await;
    assert_eq!(
        processed_texts(&h.client),
        vec![("bravo".to_string(), RequestType::Tooltip)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_same_word_does_not_restart_session() {
    let mut h = Harness::start(define_client("ok")).await;
    h.send(hover("gamma")).await;
    h.pump_for(Duration::from_millis(600)).await;
    h.send(hover("gamma")).await;
    h.pump_for(Duration::from_millis(300)).await;

    assert_eq!(processed_texts(&h.client).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pointer_leave_cancels_lookup() {
    let mut h = Harness::start(define_client("ok")).await;
    h.send(hover("delta")).await;
    h.pump_for(Duration::from_millis(300)).await;
    h.send(ContentEvent::PointerLeave).await;
    h.pump_for(Duration::from_secs(2)).await;

    assert!(processed_texts(&h.client).is_empty());
    assert!(h.updates().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_short_words_ignored() {
    let mut h = Harness::start(define_client("ok")).await;
    h.send(hover("an")).await;
    h.send(hover("éa")).await;
    h.pump_for(Duration::from_secs(2)).await;
    assert!(processed_texts(&h.client).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_no_tooltips_outside_ai_mode() {
    let mut h = Harness::with_settings(json!({
        "aiMode": false,
        "settings": { "showTooltips": true }
    }))
    .await;
    h.send(hover("epsilon")).await;
    h.pump_for(Duration::from_secs(2)).await;
    assert!(processed_texts(&h.client).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_no_tooltips_when_flag_missing() {
    let mut h = Harness::with_settings(json!({
        "aiMode": true,
        "settings": { "showIndicator": true }
    }))
    .await;
    h.send(hover("epsilon")).await;
    h.pump_for(Duration::from_secs(2)).await;
    assert!(processed_texts(&h.client).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_lookup_shows_unavailable() {
    let client = ScriptedClient::new(|command| match command {
        Command::GetSettings => Ok(Reply::Settings(ai_settings().as_object().cloned().unwrap())),
        _ => Ok(Reply::error("No API key configured for openai.")),
    });
    let mut h = Harness::start(client).await;
    h.send(hover("zeta")).await;
    h.pump_for(Duration::from_secs(1)).await;

    assert_eq!(
        h.updates().last(),
        Some(&ContentUpdate::TooltipFailed {
            word: "zeta".to_string(),
            message: TOOLTIP_UNAVAILABLE.to_string(),
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_tooltip_auto_dismisses() {
    let mut h = Harness::start(define_client("ok")).await;
    h.send(hover("theta")).await;
    h.pump_for(Duration::from_millis(850)).await;
    assert!(matches!(h.view.last(), Some(ContentUpdate::TooltipShown { .. })));

    h.pump_for(Duration::from_millis(4900)).await;
    assert!(matches!(h.view.last(), Some(ContentUpdate::TooltipShown { .. })));

    h.pump_for(Duration::from_millis(200)).await;
    assert_eq!(h.view.last(), Some(ContentUpdate::TooltipHidden));
}

#[tokio::test(start_paused = true)]
async fn test_stale_tooltip_result_dropped() {
    let mut h = Harness::start(define_client("ok")).await;
    h.send(ContentEvent::TooltipResolved {
        session: 42,
        definition: Some("late".to_string()),
    })
    .await;
    assert!(h.updates().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_selection_opens_clamped_menu() {
    let mut h = Harness::with_settings(ai_settings()).await;
    h.send(ContentEvent::Selection {
        text: "  entropy  ".to_string(),
        anchor: Some(Point::new(950.0, 690.0)),
    })
    .await;

    assert_eq!(h.controller.selected_text(), "entropy");
    assert!(h.controller.is_menu_open());
    assert_eq!(
        h.updates(),
        vec![ContentUpdate::ActionMenuOpened(Point::new(800.0, 550.0))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_menu_centred_without_anchor() {
    let mut h = Harness::with_settings(ai_settings()).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;
    assert_eq!(
        h.updates(),
        vec![ContentUpdate::ActionMenuOpened(Point::new(500.0, 350.0))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_menu_auto_closes() {
    let mut h = Harness::with_settings(ai_settings()).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;

    h.pump_for(Duration::from_millis(9_900)).await;
    assert!(h.controller.is_menu_open());
    h.pump_for(Duration::from_millis(200)).await;
    assert!(!h.controller.is_menu_open());
    assert_eq!(h.view.last(), Some(ContentUpdate::ActionMenuClosed));
}

#[tokio::test(start_paused = true)]
async fn test_old_menu_timer_does_not_close_new_menu() {
    let mut h = Harness::with_settings(ai_settings()).await;
    h.send(ContentEvent::Selection {
        text: "first".to_string(),
        anchor: None,
    })
    .await;
    h.pump_for(Duration::from_secs(6)).await;
    h.send(ContentEvent::Selection {
        text: "second".to_string(),
        anchor: None,
    })
    .await;

    h.pump_for(Duration::from_secs(5)).await;
    assert!(h.controller.is_menu_open());
}

#[tokio::test(start_paused = true)]
async fn test_empty_selection_closes_menu() {
    let mut h = Harness::with_settings(ai_settings()).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;
    h.send(ContentEvent::Selection {
        text: "   ".to_string(),
        anchor: None,
    })
    .await;
    assert!(!h.controller.is_menu_open());
    assert_eq!(h.controller.selected_text(), "entropy");
}

#[tokio::test(start_paused = true)]
async fn test_selection_outside_ai_mode_has_no_menu() {
    let mut h = Harness::with_settings(json!({ "aiMode": false })).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;
    assert!(!h.controller.is_menu_open());
    assert_eq!(h.controller.selected_text(), "entropy");
}

#[tokio::test(start_paused = true)]
async fn test_action_shows_response() {
    let mut h = Harness::start(define_client("Present everywhere.")).await;
    h.send(ContentEvent::Selection {
        text: "ubiquitous".to_string(),
        anchor: None,
    })
    .await;
    h.send(ContentEvent::Action(RequestType::Define)).await;

    assert_eq!(
        processed_texts(&h.client),
        vec![("ubiquitous".to_string(), RequestType::Define)]
    );
    assert_eq!(
        h.updates(),
        vec![
            ContentUpdate::ActionMenuOpened(Point::new(500.0, 350.0)),
            ContentUpdate::ActionMenuClosed,
            ContentUpdate::Modal(ModalView::Loading),
            ContentUpdate::Modal(ModalView::Response {
                response: "Present everywhere.".to_string(),
                original_text: "ubiquitous".to_string(),
                request_type: RequestType::Define,
            }),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_action_error_reply() {
    let client = ScriptedClient::new(|command| match command {
        Command::GetSettings => Ok(Reply::Settings(SettingsMap::new())),
        _ => Ok(Reply::error(
            "No LLM provider selected. Please configure in extension settings.",
        )),
    });
    let mut h = Harness::start(client).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;
    h.send(ContentEvent::Action(RequestType::Explain)).await;

    assert_eq!(
        h.view.last(),
        Some(ContentUpdate::Modal(ModalView::Error(
            "No LLM provider selected. Please configure in extension settings.".to_string()
        )))
    );
}

#[tokio::test(start_paused = true)]
async fn test_action_unexpected_reply() {
    let mut h = Harness::with_settings(json!({})).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;
    h.send(ContentEvent::Action(RequestType::Simplify)).await;

    assert_eq!(
        h.view.last(),
        Some(ContentUpdate::Modal(ModalView::Error(
            UNEXPECTED_RESPONSE.to_string()
        )))
    );
}

#[tokio::test(start_paused = true)]
async fn test_action_transport_failure() {
    let client = ScriptedClient::new(|command| match command {
        Command::GetSettings => Ok(Reply::Settings(SettingsMap::new())),
        _ => Err(SurfaceError::CoordinatorUnavailable("mailbox closed".to_string())),
    });
    let mut h = Harness::start(client).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;
    h.send(ContentEvent::Action(RequestType::Explain)).await;

    match h.view.last() {
        Some(ContentUpdate::Modal(ModalView::Error(message))) => {
            assert!(message.starts_with("Failed to process text: "));
            assert!(message.contains("mailbox closed"));
        }
        other => panic!("unexpected update {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_alt_a_toggles_and_persists() {
    let mut h = Harness::with_settings(json!({ "aiMode": false })).await;
    h.send(ContentEvent::KeyDown {
        key: "a".to_string(),
        alt: true,
    })
    .await;

    assert!(h.controller.ai_mode());
    let mut expected = SettingsMap::new();
    expected.insert("aiMode".to_string(), json!(true));
    assert!(h
        .client
        .commands()
        .contains(&Command::UpdateSettings { settings: expected }));
    assert_eq!(h.view.last(), Some(ContentUpdate::Mode { ai_mode: true }));
}

#[tokio::test(start_paused = true)]
async fn test_plain_a_does_nothing() {
    let mut h = Harness::with_settings(json!({ "aiMode": false })).await;
    h.send(ContentEvent::KeyDown {
        key: "a".to_string(),
        alt: false,
    })
    .await;
    assert!(!h.controller.ai_mode());
    assert_eq!(h.client.count("updateSettings"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_escape_closes_everything() {
    let mut h = Harness::start(define_client("ok")).await;
    h.send(hover("iota")).await;
    h.pump_for(Duration::from_secs(1)).await;
    h.send(ContentEvent::Selection {
        text: "entropy".to_string(),
        anchor: None,
    })
    .await;
    h.send(ContentEvent::Push(Notification::ShowError {
        error: "boom".to_string(),
    }))
    .await;
    h.view.clear();

    h.send(ContentEvent::KeyDown {
        key: "Escape".to_string(),
        alt: false,
    })
    .await;

    assert!(!h.controller.is_modal_open());
    assert!(!h.controller.is_menu_open());
    assert_eq!(
        h.updates(),
        vec![
            ContentUpdate::ModalClosed,
            ContentUpdate::ActionMenuClosed,
            ContentUpdate::TooltipHidden,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_indicator_restored_within_viewport() {
    let client = ScriptedClient::with_settings(json!({
        "aiMode": true,
        "settings": { "showIndicator": true },
        "indicatorPosition": { "left": 5000.0, "top": 12.0 }
    }));
    let client = Arc::new(client);
    let view = RecordingView::<ContentUpdate>::new();
    let (controller, _rx) =
        ContentController::new(client, view.clone(), ContentTimings::default());
    let mut controller = controller.with_viewport(Viewport::new(1000.0, 700.0));
    controller.init().await;

    assert_eq!(
        view.updates(),
        vec![
            ContentUpdate::Mode { ai_mode: true },
            ContentUpdate::IndicatorShown {
                ai_mode: true,
                at: Some(Point::new(1000.0 - INDICATOR_SIZE.width, 12.0)),
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_indicator_drag_clamps_and_persists() {
    let mut h = Harness::with_settings(json!({
        "aiMode": false,
        "settings": { "showIndicator": true }
    }))
    .await;

    h.send(ContentEvent::IndicatorDrag(Point::new(-50.0, 300.0))).await;
    h.send(ContentEvent::IndicatorDrop).await;

    assert_eq!(
        h.updates(),
        vec![ContentUpdate::IndicatorMoved(Point::new(0.0, 300.0))]
    );
    let mut expected = SettingsMap::new();
    expected.insert(
        "indicatorPosition".to_string(),
        json!({ "left": 0.0, "top": 300.0 }),
    );
    assert!(h
        .client
        .commands()
        .contains(&Command::UpdateSettings { settings: expected }));
}

#[tokio::test(start_paused = true)]
async fn test_drop_without_drag_saves_nothing() {
    let mut h = Harness::with_settings(json!({
        "settings": { "showIndicator": true }
    }))
    .await;
    h.send(ContentEvent::IndicatorDrop).await;
    assert_eq!(h.client.count("updateSettings"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_hidden_indicator_ignores_drag() {
    let mut h = Harness::with_settings(json!({ "settings": { "showIndicator": false } })).await;
    h.send(ContentEvent::IndicatorDrag(Point::new(10.0, 10.0))).await;
    h.send(ContentEvent::IndicatorDrop).await;
    assert!(h.updates().is_empty());
    assert_eq!(h.client.count("updateSettings"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_resize_reclamps_indicator() {
    let mut h = Harness::with_settings(json!({ "settings": { "showIndicator": true } })).await;
    h.send(ContentEvent::IndicatorDrag(Point::new(900.0, 600.0))).await;
    h.view.clear();

    h.send(ContentEvent::Resize(Viewport::new(500.0, 400.0))).await;
    assert_eq!(
        h.updates(),
        vec![ContentUpdate::IndicatorMoved(Point::new(
            500.0 - INDICATOR_SIZE.width,
            400.0 - INDICATOR_SIZE.height
        ))]
    );
}

#[tokio::test(start_paused = true)]
async fn test_push_toggle_mode() {
    let mut h = Harness::with_settings(json!({ "aiMode": false })).await;
    h.send(ContentEvent::Push(Notification::ToggleMode { ai_mode: true }))
        .await;
    assert!(h.controller.ai_mode());
    assert_eq!(h.updates(), vec![ContentUpdate::Mode { ai_mode: true }]);
}

#[tokio::test(start_paused = true)]
async fn test_push_show_ai_response() {
    let mut h = Harness::with_settings(json!({})).await;
    h.send(ContentEvent::Push(Notification::ShowAiResponse {
        response: "Disorder.".to_string(),
        original_text: "entropy".to_string(),
        request_type: RequestType::Explain,
    }))
    .await;
    assert!(h.controller.is_modal_open());
    assert_eq!(
        h.updates(),
        vec![ContentUpdate::Modal(ModalView::Response {
            response: "Disorder.".to_string(),
            original_text: "entropy".to_string(),
            request_type: RequestType::Explain,
        })]
    );
}

#[tokio::test(start_paused = true)]
async fn test_push_settings_updated_refetches() {
    let mut h = Harness::with_settings(json!({ "aiMode": true })).await;
    h.send(ContentEvent::Push(Notification::SettingsUpdated)).await;
    assert_eq!(h.client.count("getSettings"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_settings_update_shows_indicator() {
    let client = ScriptedClient::new({
        let calls = parking_lot::Mutex::new(0);
        move |command| match command {
            Command::GetSettings => {
                let mut calls = calls.lock();
                *calls += 1;
                let show = *calls > 1;
                Ok(Reply::Settings(
                    json!({ "settings": { "showIndicator": show } })
                        .as_object()
                        .cloned()
                        .unwrap(),
                ))
            }
            _ => Ok(Reply::ack()),
        }
    });
    let mut h = Harness::start(client).await;
    h.send(ContentEvent::Push(Notification::SettingsUpdated)).await;
    assert!(h.updates().contains(&ContentUpdate::IndicatorShown {
        ai_mode: false,
        at: None,
    }));
}

#[tokio::test(start_paused = true)]
async fn test_run_handles_pushes_from_surface() {
    let client = Arc::new(ScriptedClient::with_settings(json!({ "aiMode": false })));
    let view = RecordingView::<ContentUpdate>::new();
    let (controller, rx) =
        ContentController::new(client, view.clone(), ContentTimings::default());
    let surface = ChannelSurface::new("content-1", SurfaceKind::Content, controller.sender());
    let task = controller.spawn(rx);

    surface
        .deliver(Notification::ToggleMode { ai_mode: true })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(view.last(), Some(ContentUpdate::Mode { ai_mode: true }));
    task.abort();
}

//! The in-page overlay.
//!
//! Hovering a word in AI mode shows a one-line definition after a short
//! debounce; selecting text opens an action menu whose buttons run the
//! explain/simplify/define pipeline and show the result in a modal. A small
//! draggable indicator shows the current mode when enabled.
//!
//! Delayed work (hover debounce, tooltip and menu expiry) is scheduled back
//! into the controller's own mailbox as events tagged with the session or
//! generation that scheduled them. Anything tagged with a stale tag is
//! dropped, which is how a superseded hover or menu gets cancelled.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use zegoop_protocols::{
    keys, Command, CoordinatorClient, Notification, Reply, RequestType, Settings, SettingsMap,
};

use crate::cache::SettingsCache;
use crate::error::RequestError;
use crate::geometry::{Point, Size, Viewport};
use crate::view::View;

const MAILBOX_CAPACITY: usize = 64;

/// Hovered words shorter than this are ignored.
pub const MIN_HOVER_WORD_LEN: usize = 3;

/// Rendered size of the mode indicator.
pub const INDICATOR_SIZE: Size = Size::new(64.0, 28.0);

pub const TOOLTIP_UNAVAILABLE: &str = "Definition not available";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response format from AI service";

/// Delays used by the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentTimings {
    pub hover_delay: Duration,
    pub tooltip_dismiss: Duration,
    pub action_menu_dismiss: Duration,
}

impl Default for ContentTimings {
    fn default() -> Self {
        Self {
            hover_delay: Duration::from_millis(800),
            tooltip_dismiss: Duration::from_secs(5),
            action_menu_dismiss: Duration::from_secs(10),
        }
    }
}

/// Everything that can happen to the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEvent {
    /// The pointer rests on `word`.
    Hover { word: String, at: Point },
    /// The pointer left the hovered word.
    PointerLeave,
    /// The page selection changed. `anchor` is the bottom-right corner of
    /// the selection when known.
    Selection { text: String, anchor: Option<Point> },
    /// An action menu button.
    Action(RequestType),
    /// The action menu's cancel button.
    DismissMenu,
    KeyDown { key: String, alt: bool },
    /// The indicator is being dragged; `to` is its new top-left corner.
    IndicatorDrag(Point),
    IndicatorDrop,
    Resize(Viewport),
    /// A push from the coordinator.
    Push(Notification),

    // Scheduled by the controller itself.
    HoverElapsed { session: u64 },
    TooltipResolved { session: u64, definition: Option<String> },
    TooltipExpired { session: u64 },
    MenuExpired { generation: u64 },
}

impl From<Notification> for ContentEvent {
    fn from(notification: Notification) -> Self {
        Self::Push(notification)
    }
}

/// What the modal shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalView {
    Loading,
    Response {
        response: String,
        original_text: String,
        request_type: RequestType,
    },
    Error(String),
}

/// A change the overlay wants drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentUpdate {
    Mode { ai_mode: bool },
    IndicatorShown { ai_mode: bool, at: Option<Point> },
    IndicatorMoved(Point),
    IndicatorHidden,
    ActionMenuOpened(Point),
    ActionMenuClosed,
    TooltipLoading { word: String, at: Point },
    TooltipShown { word: String, definition: String },
    TooltipFailed { word: String, message: String },
    TooltipHidden,
    Modal(ModalView),
    ModalClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TooltipState {
    Pending,
    Loading,
    Shown,
}

#[derive(Debug)]
struct HoverSession {
    id: u64,
    word: String,
    pointer: Point,
    tooltip: TooltipState,
}

#[derive(Debug, Default)]
struct Indicator {
    position: Option<Point>,
    dragging: bool,
}

/// Controller for one page.
pub struct ContentController {
    client: Arc<dyn CoordinatorClient>,
    view: Arc<dyn View<ContentUpdate>>,
    mailbox: mpsc::Sender<ContentEvent>,
    timings: ContentTimings,
    viewport: Viewport,
    cache: SettingsCache,
    ai_mode: bool,
    selected_text: String,
    hover: Option<HoverSession>,
    next_session: u64,
    menu: Option<u64>,
    next_menu: u64,
    modal_open: bool,
    indicator: Option<Indicator>,
}

impl ContentController {
    /// Create a controller and the receiving end of its mailbox.
    pub fn new(
        client: Arc<dyn CoordinatorClient>,
        view: Arc<dyn View<ContentUpdate>>,
        timings: ContentTimings,
    ) -> (Self, mpsc::Receiver<ContentEvent>) {
        let (mailbox, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let controller = Self {
            client,
            view,
            mailbox,
            timings,
            viewport: Viewport::default(),
            cache: SettingsCache::new(),
            ai_mode: false,
            selected_text: String::new(),
            hover: None,
            next_session: 0,
            menu: None,
            next_menu: 0,
            modal_open: false,
            indicator: None,
        };
        (controller, rx)
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Sender for the mailbox, for wiring up a push surface.
    pub fn sender(&self) -> mpsc::Sender<ContentEvent> {
        self.mailbox.clone()
    }

    pub fn ai_mode(&self) -> bool {
        self.ai_mode
    }

    pub fn settings(&self) -> &Settings {
        self.cache.settings()
    }

    pub fn selected_text(&self) -> &str {
        &self.selected_text
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Load settings and draw the initial mode.
    pub async fn init(&mut self) {
        self.reload().await;
    }

    /// Initialise, then handle events until the task is aborted.
    pub async fn run(mut self, mut rx: mpsc::Receiver<ContentEvent>) {
        self.init().await;
        while let Some(event) = rx.recv().await {
            self.dispatch(event).await;
        }
    }

    pub fn spawn(self, rx: mpsc::Receiver<ContentEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    pub async fn dispatch(&mut self, event: ContentEvent) {
        match event {
            ContentEvent::Hover { word, at } => self.on_hover(word, at),
            ContentEvent::PointerLeave => self.end_hover(),
            ContentEvent::Selection { text, anchor } => self.on_selection(&text, anchor),
            ContentEvent::Action(request_type) => self.run_action(request_type).await,
            ContentEvent::DismissMenu => self.close_menu(),
            ContentEvent::KeyDown { key, alt } => self.on_key(&key, alt).await,
            ContentEvent::IndicatorDrag(to) => self.drag_indicator(to),
            ContentEvent::IndicatorDrop => self.drop_indicator().await,
            ContentEvent::Resize(viewport) => self.resize(viewport),
            ContentEvent::Push(notification) => self.on_push(notification).await,
            ContentEvent::HoverElapsed { session } => self.lookup_tooltip(session),
            ContentEvent::TooltipResolved {
                session,
                definition,
            } => self.show_tooltip(session, definition),
            ContentEvent::TooltipExpired { session } => {
                if self.current_session() == Some(session) {
                    self.end_hover();
                }
            }
            ContentEvent::MenuExpired { generation } => {
                if self.menu == Some(generation) {
                    self.close_menu();
                }
            }
        }
    }

    async fn reload(&mut self) {
        if let Err(e) = self.cache.refresh(self.client.as_ref()).await {
            warn!("Failed to load settings: {}", e);
        }
        self.ai_mode = self.cache.settings().ai_mode;
        self.update_mode();
    }

    fn schedule(&self, delay: Duration, event: ContentEvent) {
        let mailbox = self.mailbox.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = mailbox.send(event).await;
        });
    }

    // --- Hover tooltips ---

    fn tooltips_enabled(&self) -> bool {
        self.ai_mode && self.cache.settings().settings.show_tooltips == Some(true)
    }

    fn current_session(&self) -> Option<u64> {
        self.hover.as_ref().map(|h| h.id)
    }

    fn on_hover(&mut self, word: String, pointer: Point) {
        if !self.tooltips_enabled() || word.chars().count() < MIN_HOVER_WORD_LEN {
            return;
        }
        if self.hover.as_ref().is_some_and(|h| h.word == word) {
            return;
        }

        self.end_hover();
        self.next_session += 1;
        let session = self.next_session;
        debug!("Hover session {} for {:?}", session, word);
        self.hover = Some(HoverSession {
            id: session,
            word,
            pointer,
            tooltip: TooltipState::Pending,
        });
        self.schedule(self.timings.hover_delay, ContentEvent::HoverElapsed { session });
    }

    /// Cancel the hover session and hide its tooltip.
    fn end_hover(&mut self) {
        if let Some(hover) = self.hover.take() {
            if hover.tooltip != TooltipState::Pending {
                self.view.render(ContentUpdate::TooltipHidden);
            }
        }
    }

    fn lookup_tooltip(&mut self, session: u64) {
        let Some(hover) = self.hover.as_mut().filter(|h| h.id == session) else {
            return;
        };
        if hover.tooltip != TooltipState::Pending {
            return;
        }
        hover.tooltip = TooltipState::Loading;
        let word = hover.word.clone();
        let at = self.viewport.tooltip_origin(hover.pointer);

        self.view.render(ContentUpdate::TooltipLoading {
            word: word.clone(),
            at,
        });

        let client = self.client.clone();
        let mailbox = self.mailbox.clone();
        tokio::spawn(async move {
            let command = Command::ProcessText {
                text: word,
                request_type: RequestType::Tooltip,
            };
            let definition = match client.request(command).await {
                Ok(Reply::Completion { response, .. }) if !response.is_empty() => Some(response),
                Ok(reply) => {
                    debug!("Tooltip lookup failed: {:?}", reply.error_message());
                    None
                }
                Err(e) => {
                    debug!("Tooltip lookup failed: {}", e);
                    None
                }
            };
            let _ = mailbox
                .send(ContentEvent::TooltipResolved {
                    session,
                    definition,
                })
                .await;
        });
    }

    fn show_tooltip(&mut self, session: u64, definition: Option<String>) {
        let Some(hover) = self.hover.as_mut().filter(|h| h.id == session) else {
            debug!("Dropping tooltip for superseded session {}", session);
            return;
        };
        hover.tooltip = TooltipState::Shown;
        let word = hover.word.clone();

        self.view.render(match definition {
            Some(definition) => ContentUpdate::TooltipShown { word, definition },
            None => ContentUpdate::TooltipFailed {
                word,
                message: TOOLTIP_UNAVAILABLE.to_string(),
            },
        });
        self.schedule(
            self.timings.tooltip_dismiss,
            ContentEvent::TooltipExpired { session },
        );
    }

    // --- Selection actions ---

    fn on_selection(&mut self, text: &str, anchor: Option<Point>) {
        let text = text.trim();
        if text.is_empty() {
            self.close_menu();
            return;
        }
        self.selected_text = text.to_string();
        if self.ai_mode {
            self.open_menu(anchor);
        }
    }

    fn open_menu(&mut self, anchor: Option<Point>) {
        self.close_menu();
        self.next_menu += 1;
        let generation = self.next_menu;
        self.menu = Some(generation);
        self.view.render(ContentUpdate::ActionMenuOpened(
            self.viewport.action_menu_origin(anchor),
        ));
        self.schedule(
            self.timings.action_menu_dismiss,
            ContentEvent::MenuExpired { generation },
        );
    }

    fn close_menu(&mut self) {
        if self.menu.take().is_some() {
            self.view.render(ContentUpdate::ActionMenuClosed);
        }
    }

    async fn run_action(&mut self, request_type: RequestType) {
        self.close_menu();
        if self.selected_text.is_empty() {
            return;
        }
        let text = self.selected_text.clone();
        self.show_modal(ModalView::Loading);

        let command = Command::ProcessText {
            text: text.clone(),
            request_type: request_type.clone(),
        };
        let modal = match self.client.request(command).await {
            Ok(Reply::Error { error }) => ModalView::Error(error),
            Ok(Reply::Completion { response, .. }) if !response.is_empty() => {
                ModalView::Response {
                    response,
                    original_text: text,
                    request_type,
                }
            }
            Ok(_) => ModalView::Error(UNEXPECTED_RESPONSE.to_string()),
            Err(e) => ModalView::Error(format!("Failed to process text: {}", e)),
        };
        self.show_modal(modal);
    }

    fn show_modal(&mut self, modal: ModalView) {
        self.modal_open = true;
        self.view.render(ContentUpdate::Modal(modal));
    }

    fn close_modal(&mut self) {
        if self.modal_open {
            self.modal_open = false;
            self.view.render(ContentUpdate::ModalClosed);
        }
    }

    // --- Keyboard and mode ---

    async fn on_key(&mut self, key: &str, alt: bool) {
        if alt && key == "a" {
            self.toggle_mode().await;
        }
        if key == "Escape" {
            self.close_modal();
            self.close_menu();
            self.end_hover();
        }
    }

    async fn toggle_mode(&mut self) {
        self.ai_mode = !self.ai_mode;
        self.cache.set(keys::AI_MODE, Value::Bool(self.ai_mode));
        self.persist(keys::AI_MODE, Value::Bool(self.ai_mode)).await;
        self.update_mode();
    }

    async fn persist(&self, key: &str, value: Value) {
        let mut partial = SettingsMap::new();
        partial.insert(key.to_string(), value);
        let result = self
            .client
            .request(Command::UpdateSettings { settings: partial })
            .await;
        if let Err(e) = RequestError::check(result) {
            warn!("Failed to save {}: {}", key, e);
        }
    }

    fn update_mode(&mut self) {
        self.view.render(ContentUpdate::Mode {
            ai_mode: self.ai_mode,
        });
        self.sync_indicator();
    }

    // --- Mode indicator ---

    fn sync_indicator(&mut self) {
        let wanted = self.cache.settings().settings.show_indicator == Some(true);
        match (wanted, self.indicator.is_some()) {
            (true, false) => {
                let position = self
                    .cache
                    .settings()
                    .indicator_position
                    .map(|saved| self.viewport.clamp(saved.into(), INDICATOR_SIZE));
                self.indicator = Some(Indicator {
                    position,
                    dragging: false,
                });
                self.view.render(ContentUpdate::IndicatorShown {
                    ai_mode: self.ai_mode,
                    at: position,
                });
            }
            (false, true) => {
                self.indicator = None;
                self.view.render(ContentUpdate::IndicatorHidden);
            }
            _ => {}
        }
    }

    fn drag_indicator(&mut self, to: Point) {
        let clamped = self.viewport.clamp(to, INDICATOR_SIZE);
        let Some(indicator) = self.indicator.as_mut() else {
            return;
        };
        indicator.position = Some(clamped);
        indicator.dragging = true;
        self.view.render(ContentUpdate::IndicatorMoved(clamped));
    }

    async fn drop_indicator(&mut self) {
        let Some(indicator) = self.indicator.as_mut().filter(|i| i.dragging) else {
            return;
        };
        indicator.dragging = false;
        let Some(position) = indicator.position else {
            return;
        };
        let value = json!({ "left": position.x, "top": position.y });
        self.cache.set(keys::INDICATOR_POSITION, value.clone());
        self.persist(keys::INDICATOR_POSITION, value).await;
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let Some(indicator) = self.indicator.as_mut() else {
            return;
        };
        if let Some(position) = indicator.position {
            let clamped = viewport.clamp(position, INDICATOR_SIZE);
            if clamped != position {
                indicator.position = Some(clamped);
                self.view.render(ContentUpdate::IndicatorMoved(clamped));
            }
        }
    }

    // --- Pushes ---

    async fn on_push(&mut self, notification: Notification) {
        debug!("Content push: {:?}", notification);
        match notification {
            Notification::ToggleMode { ai_mode } => {
                self.ai_mode = ai_mode;
                self.cache.set(keys::AI_MODE, Value::Bool(ai_mode));
                self.update_mode();
            }
            Notification::ShowAiResponse {
                response,
                original_text,
                request_type,
            } => self.show_modal(ModalView::Response {
                response,
                original_text,
                request_type,
            }),
            Notification::ShowError { error } => self.show_modal(ModalView::Error(error)),
            Notification::SettingsUpdated => self.reload().await,
        }
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;

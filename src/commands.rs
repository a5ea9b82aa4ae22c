//! One-shot commands that drive the surface controllers from the terminal.
//!
//! Each command attaches a console surface to the in-process coordinator,
//! runs one controller operation and prints the outcome. Failures are
//! printed where they happen; the returned error only sets the exit code.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use zegoop_config::SurfacesConfig;
use zegoop_protocols::{keys, Notification, RequestType, SettingsMap, SurfaceKind};
use zegoop_surfaces::{
    ChannelSurface, ContentController, ContentEvent, ContentTimings, OptionsController, OptionsEvent,
    PopupController, PopupStatus,
};

use crate::cli::{ModeAction, SettingsAction};
use crate::server::App;
use crate::view::TerminalView;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

const CONSOLE_ID: &str = "console";

/// Register the console surface so pushes reach the controller's mailbox.
fn attach<E>(app: &App, mailbox: mpsc::Sender<E>) -> CommandResult
where
    E: From<Notification> + Send + 'static,
{
    app.surfaces.register(Arc::new(ChannelSurface::new(
        CONSOLE_ID,
        SurfaceKind::Console,
        mailbox,
    )))?;
    Ok(())
}

fn detach(app: &App) {
    let _ = app.surfaces.unregister(CONSOLE_ID);
}

async fn options_page(
    app: &App,
) -> Result<(OptionsController, mpsc::Receiver<OptionsEvent>), Box<dyn std::error::Error>> {
    let (mut options, rx) =
        OptionsController::new(Arc::new(app.handle.client(CONSOLE_ID)), Arc::new(TerminalView));
    attach(app, options.sender())?;
    options.init().await;
    Ok((options, rx))
}

pub(crate) async fn settings(app: &App, action: SettingsAction) -> CommandResult {
    let (mut options, _mailbox) = options_page(app).await?;

    let result = match action {
        SettingsAction::Show => {
            let mut map = options.settings_map().clone();
            mask_api_keys(&mut map);
            println!("{}", serde_json::to_string_pretty(&Value::Object(map))?);
            Ok(())
        }
        SettingsAction::Set { key, value } => {
            let value = parse_value(value);
            match options.set_value(&key, value).await {
                Ok(()) => {
                    println!("Set {}", key);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Failed to save settings: {}", e);
                    Err(e.into())
                }
            }
        }
        SettingsAction::Reset => options.reset().await.map_err(Into::into),
    };

    detach(app);
    result
}

pub(crate) async fn mode(app: &App, action: Option<ModeAction>) -> CommandResult {
    let (mut popup, _mailbox) =
        PopupController::new(Arc::new(app.handle.client(CONSOLE_ID)), Arc::new(TerminalView));
    attach(app, popup.sender())?;
    popup.init().await;

    let result = match action {
        None => Ok(popup.status()),
        Some(ModeAction::Toggle) => popup.toggle().await,
        Some(ModeAction::On) => popup.set_mode(true).await,
        Some(ModeAction::Off) => popup.set_mode(false).await,
    };

    detach(app);
    print_status(&result?);
    Ok(())
}

pub(crate) async fn ask(
    app: &App,
    surfaces: &SurfacesConfig,
    request_type: &str,
    text: &str,
) -> CommandResult {
    let text = text.trim();
    if text.is_empty() {
        eprintln!("Nothing to send");
        return Err("empty text".into());
    }

    let (mut content, _mailbox) = ContentController::new(
        Arc::new(app.handle.client(CONSOLE_ID)),
        Arc::new(TerminalView),
        timings(surfaces),
    );
    attach(app, content.sender())?;
    content.init().await;

    debug!("Asking {} for {} chars", request_type, text.len());
    content
        .dispatch(ContentEvent::Selection {
            text: text.to_string(),
            anchor: None,
        })
        .await;
    content
        .dispatch(ContentEvent::Action(RequestType::from(request_type)))
        .await;

    detach(app);
    Ok(())
}

pub(crate) async fn test_provider(app: &App, provider: &str, api_key: &str) -> CommandResult {
    let (options, _mailbox) = options_page(app).await?;

    let mut form = options.form();
    form.selected_llm = provider.to_string();
    form.api_keys.insert(provider.to_string(), api_key.to_string());
    let result = options.test_connection(&form).await;

    detach(app);
    let response = result?;
    println!("{}", response);
    Ok(())
}

fn timings(surfaces: &SurfacesConfig) -> ContentTimings {
    ContentTimings {
        hover_delay: Duration::from_millis(surfaces.hover_delay_ms),
        tooltip_dismiss: Duration::from_millis(surfaces.tooltip_dismiss_ms),
        action_menu_dismiss: Duration::from_millis(surfaces.action_menu_dismiss_ms),
    }
}

fn print_status(status: &PopupStatus) {
    println!("Mode:     {}", status.mode_label);
    println!("Provider: {}", status.provider_name);
    println!("API:      {}", status.api_status);
}

/// Parse a command-line value as JSON, falling back to a plain string.
fn parse_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

fn mask_api_keys(map: &mut SettingsMap) {
    if let Some(Value::Object(api_keys)) = map.get_mut(keys::API_KEYS) {
        for value in api_keys.values_mut() {
            if let Value::String(key) = value {
                *key = mask(key);
            }
        }
    }
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    if key.chars().count() <= 8 {
        return "****".to_string();
    }
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

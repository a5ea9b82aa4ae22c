//! Terminal rendering for the console surface.

use zegoop_surfaces::{
    ContentUpdate, ModalView, OptionsUpdate, PopupUpdate, ToastKind, View,
};

/// Prints surface updates to the terminal. Purely visual updates (menus,
/// indicator) are skipped.
pub(crate) struct TerminalView;

impl View<ContentUpdate> for TerminalView {
    fn render(&self, update: ContentUpdate) {
        match update {
            ContentUpdate::Modal(ModalView::Loading) => eprintln!("Processing..."),
            ContentUpdate::Modal(ModalView::Response {
                response,
                original_text,
                request_type,
            }) => {
                println!("{}: \"{}\"", request_type.title(), original_text);
                println!();
                println!("{}", response);
            }
            ContentUpdate::Modal(ModalView::Error(error)) => eprintln!("Error: {}", error),
            ContentUpdate::TooltipShown { word, definition } => {
                println!("{}: {}", word, definition)
            }
            ContentUpdate::TooltipFailed { word, message } => eprintln!("{}: {}", word, message),
            _ => {}
        }
    }
}

impl View<PopupUpdate> for TerminalView {
    fn render(&self, update: PopupUpdate) {
        match update {
            // Printed once by the command when it is done.
            PopupUpdate::Status(_) => {}
            PopupUpdate::ModeReverted { ai_mode } => {
                eprintln!("Mode change failed; still {}", if ai_mode { "on" } else { "off" })
            }
        }
    }
}

impl View<OptionsUpdate> for TerminalView {
    fn render(&self, update: OptionsUpdate) {
        match update {
            OptionsUpdate::Toast { kind, message } | OptionsUpdate::TestResult { kind, message } => {
                match kind {
                    ToastKind::Success => println!("{}", message),
                    ToastKind::Error => eprintln!("{}", message),
                }
            }
            OptionsUpdate::Testing => eprintln!("Testing..."),
            OptionsUpdate::Form(_) => {}
        }
    }
}

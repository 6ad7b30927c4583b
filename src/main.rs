mod terminal;
mod ui;

use crate::ui::{FormField, UIMode};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use tokio::sync::mpsc;
use tracing::{info, warn};
use valentui::config::{Config, matches_key};
use valentui::db::{Database, MessageStore};
use valentui::error::AppError;
use valentui::gate::AdminGate;
use valentui::logging;
use valentui::models::Message;
use valentui::toggle::{self, PendingToggle};

/// Result of a fulfillment update that ran on a background task
struct ToggleOutcome {
    pending: PendingToggle,
    result: Result<Message, AppError>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let debug_logging = std::env::args().any(|arg| arg == "--debug");
    logging::init(debug_logging)?;

    let config = Config::load();
    let db = Database::new(
        &config.store.database_url,
        config.store.max_connections,
        config.store.timeout(),
    )?;
    if let Err(e) = db.ensure_initialized().await {
        warn!("could not prepare the messages table yet: {}", e);
    }
    let mut gate = AdminGate::new(config.admin.secret.clone());
    info!("valentui started");

    // Dropped on every exit path, so errors and panics leave a usable terminal
    let _terminal_guard = terminal::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut ui_state = ui::UIState::default();
    let (toggle_tx, mut toggle_rx) = mpsc::channel::<ToggleOutcome>(16);

    loop {
        // Reconcile optimistic toggles with what the store answered
        while let Ok(outcome) = toggle_rx.try_recv() {
            let description = outcome.pending.description();
            let reconciled =
                ui_state.toggles.finish(&mut ui_state.messages, outcome.pending, outcome.result);
            match reconciled {
                Ok(()) => ui_state.status_message = Some(format!("Status updated ({})", description)),
                Err(e) => ui_state.status_message = Some(e.user_message()),
            }
            ui_state.clamp_selection();
        }

        terminal.draw(|f| ui::render(f, &mut ui_state))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if matches_key(key, &config.keybindings.quit) {
            break;
        }

        match ui_state.mode {
            UIMode::Composing => {
                if matches_key(key, &config.keybindings.open_admin) {
                    ui_state.status_message = None;
                    if gate.is_unlocked() {
                        ui_state.mode = UIMode::Admin;
                        reload_messages(&mut ui_state, &db, &gate).await;
                    } else {
                        ui_state.mode = UIMode::Unlocking;
                        ui_state.auth_error = None;
                        ui_state.clear_password();
                    }
                } else if matches_key(key, &config.keybindings.submit) {
                    submit_form(&mut ui_state, &db).await;
                } else if matches_key(key, &config.keybindings.switch_contact_method) {
                    ui_state.form.switch_contact_method();
                } else if matches_key(key, &config.keybindings.next_field) {
                    ui_state.form.focused_field = ui_state.form.focused_field.next();
                } else if matches_key(key, &config.keybindings.prev_field) {
                    ui_state.form.focused_field = ui_state.form.focused_field.prev();
                } else {
                    edit_form(&mut ui_state, key);
                }
            }
            UIMode::Sent => {
                ui_state.mode = UIMode::Composing;
            }
            UIMode::Unlocking => {
                if matches_key(key, &config.keybindings.back) {
                    ui_state.mode = UIMode::Composing;
                    ui_state.clear_password();
                } else if key.code == KeyCode::Enter {
                    let password = ui_state.password.lines().join("");
                    match gate.attempt_unlock(&password) {
                        Ok(()) => {
                            ui_state.auth_error = None;
                            ui_state.mode = UIMode::Admin;
                            reload_messages(&mut ui_state, &db, &gate).await;
                        }
                        Err(e) => ui_state.auth_error = Some(e.user_message()),
                    }
                    ui_state.clear_password();
                } else {
                    ui_state.password.input(key);
                }
            }
            UIMode::Admin => {
                if matches_key(key, &config.keybindings.back) {
                    ui_state.mode = UIMode::Composing;
                    ui_state.status_message = None;
                } else if matches_key(key, &config.keybindings.next_tab) {
                    ui_state.set_filter(ui_state.filter.next());
                } else if matches_key(key, &config.keybindings.prev_tab) {
                    ui_state.set_filter(ui_state.filter.prev());
                } else if matches_key(key, &config.keybindings.scroll_down) {
                    ui_state.scroll_detail_down();
                } else if matches_key(key, &config.keybindings.scroll_up) {
                    ui_state.scroll_detail_up();
                } else if matches_key(key, &config.keybindings.move_down) {
                    let len = ui_state.visible_messages().len();
                    if ui_state.selected_message_index < len.saturating_sub(1) {
                        ui_state.selected_message_index += 1;
                        ui_state.detail_scroll = 0;
                    }
                } else if matches_key(key, &config.keybindings.move_up) {
                    if ui_state.selected_message_index > 0 {
                        ui_state.selected_message_index -= 1;
                        ui_state.detail_scroll = 0;
                    }
                } else if matches_key(key, &config.keybindings.refresh) {
                    reload_messages(&mut ui_state, &db, &gate).await;
                } else if matches_key(key, &config.keybindings.toggle_fulfilled) {
                    if !gate.is_unlocked() {
                        continue;
                    }
                    let Some(id) = ui_state.selected_message().map(|m| m.id.clone()) else {
                        continue;
                    };
                    if let Some(pending) = ui_state.toggles.begin(&mut ui_state.messages, &id) {
                        ui_state.clamp_selection();
                        let db = db.clone();
                        let tx = toggle_tx.clone();
                        tokio::spawn(async move {
                            let result = toggle::commit(&db, &pending).await;
                            let _ = tx.send(ToggleOutcome { pending, result }).await;
                        });
                    } else if ui_state.toggles.is_in_flight(&id) {
                        ui_state.status_message = Some("Still saving the previous change".to_string());
                    }
                }
            }
        }
    }

    info!("valentui exiting");
    Ok(())
}

/// Replaces the local list with the store's. Only callable past the gate.
async fn reload_messages(ui_state: &mut ui::UIState<'_>, db: &Database, gate: &AdminGate) {
    if !gate.is_unlocked() {
        return;
    }
    match db.list_messages().await {
        Ok(messages) => {
            ui_state.messages = messages;
            ui_state.status_message = None;
            ui_state.clamp_selection();
        }
        Err(e) => ui_state.status_message = Some(e.user_message()),
    }
}

async fn submit_form(ui_state: &mut ui::UIState<'_>, db: &Database) {
    // Bad input never reaches the store
    let draft = match ui_state.form.draft().validated() {
        Ok(draft) => draft,
        Err(e) => {
            ui_state.status_message = Some(e.user_message());
            return;
        }
    };

    match db.create_message(&draft).await {
        Ok(_) => {
            ui_state.form.reset();
            ui_state.status_message = None;
            ui_state.mode = UIMode::Sent;
        }
        Err(AppError::Validation(msg)) => ui_state.status_message = Some(msg),
        Err(_) => {
            ui_state.status_message = Some("Failed to send message. Please try again.".to_string())
        }
    }
}

fn edit_form(ui_state: &mut ui::UIState<'_>, key: KeyEvent) {
    let form = &mut ui_state.form;
    match (form.focused_field, key.code) {
        (FormField::ContactMethod, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => {
            form.switch_contact_method();
        }
        (FormField::ContactMethod, KeyCode::Enter) => {
            form.focused_field = form.focused_field.next();
        }
        // Only the message body takes newlines
        (FormField::Recipient | FormField::ContactValue, KeyCode::Enter) => {
            form.focused_field = form.focused_field.next();
        }
        _ => {
            if let Some(textarea) = form.focused_textarea() {
                textarea.input(key);
            }
        }
    }
}

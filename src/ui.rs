use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tui_textarea::TextArea;
use valentui::filter::{self, MessageFilter};
use valentui::models::{ContactMethod, Message, NewMessage};
use valentui::toggle::Toggles;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum UIMode {
    #[default]
    Composing,
    Sent,
    Unlocking,
    Admin,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum FormField {
    #[default]
    Recipient,
    Message,
    ContactMethod,
    ContactValue,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Recipient => FormField::Message,
            FormField::Message => FormField::ContactMethod,
            FormField::ContactMethod => FormField::ContactValue,
            FormField::ContactValue => FormField::Recipient,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Recipient => FormField::ContactValue,
            FormField::Message => FormField::Recipient,
            FormField::ContactMethod => FormField::Message,
            FormField::ContactValue => FormField::ContactMethod,
        }
    }
}

fn plain_textarea<'a>(placeholder: &'static str) -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text(placeholder);
    textarea
}

fn text_of(textarea: &TextArea<'_>) -> String {
    textarea.lines().join("\n")
}

pub struct FormState<'a> {
    pub recipient: TextArea<'a>,
    pub message: TextArea<'a>,
    pub contact_value: TextArea<'a>,
    pub contact_method: ContactMethod,
    pub focused_field: FormField,
}

impl<'a> Default for FormState<'a> {
    fn default() -> Self {
        let contact_method = ContactMethod::default();
        Self {
            recipient: plain_textarea("Who is this for?"),
            message: plain_textarea("Write your message..."),
            contact_value: plain_textarea(contact_placeholder(contact_method)),
            contact_method,
            focused_field: FormField::Recipient,
        }
    }
}

fn contact_placeholder(method: ContactMethod) -> &'static str {
    match method {
        ContactMethod::Email => "email@example.com",
        ContactMethod::Phone => "+1 (555) 123-4567",
    }
}

impl<'a> FormState<'a> {
    pub fn draft(&self) -> NewMessage {
        NewMessage {
            recipient_name: text_of(&self.recipient),
            message: text_of(&self.message),
            contact_method: self.contact_method,
            contact_value: text_of(&self.contact_value),
        }
    }

    pub fn switch_contact_method(&mut self) {
        self.contact_method = self.contact_method.toggled();
        self.contact_value
            .set_placeholder_text(contact_placeholder(self.contact_method));
    }

    /// The textarea under the cursor; the method selector has none.
    pub fn focused_textarea(&mut self) -> Option<&mut TextArea<'a>> {
        match self.focused_field {
            FormField::Recipient => Some(&mut self.recipient),
            FormField::Message => Some(&mut self.message),
            FormField::ContactMethod => None,
            FormField::ContactValue => Some(&mut self.contact_value),
        }
    }

    /// Clears the text after a successful send but keeps the chosen method.
    pub fn reset(&mut self) {
        let method = self.contact_method;
        *self = Self::default();
        if method != self.contact_method {
            self.switch_contact_method();
        }
    }
}

pub struct UIState<'a> {
    pub mode: UIMode,
    pub form: FormState<'a>,
    pub password: TextArea<'a>,
    pub auth_error: Option<String>,
    pub messages: Vec<Message>,
    pub filter: MessageFilter,
    pub selected_message_index: usize,
    pub messages_list_state: ListState,
    pub detail_scroll: u16,
    pub status_message: Option<String>,
    pub toggles: Toggles,
}

fn password_textarea<'a>() -> TextArea<'a> {
    let mut textarea = plain_textarea("Password");
    textarea.set_mask_char('•');
    textarea
}

impl<'a> Default for UIState<'a> {
    fn default() -> Self {
        Self {
            mode: UIMode::Composing,
            form: FormState::default(),
            password: password_textarea(),
            auth_error: None,
            messages: Vec::new(),
            filter: MessageFilter::default(),
            selected_message_index: 0,
            messages_list_state: ListState::default(),
            detail_scroll: 0,
            status_message: None,
            toggles: Toggles::default(),
        }
    }
}

impl<'a> UIState<'a> {
    pub fn visible_messages(&self) -> Vec<&Message> {
        self.filter.apply(&self.messages)
    }

    pub fn selected_message(&self) -> Option<&Message> {
        self.visible_messages()
            .get(self.selected_message_index)
            .copied()
    }

    /// Keeps the selection inside the filtered list after it shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_messages().len();
        if self.selected_message_index >= len {
            self.selected_message_index = len.saturating_sub(1);
        }
    }

    pub fn set_filter(&mut self, filter: MessageFilter) {
        self.filter = filter;
        self.selected_message_index = 0;
        self.detail_scroll = 0;
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn clear_password(&mut self) {
        self.password = password_textarea();
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn panel_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn format_time(message: &Message) -> String {
    message
        .created_at
        .with_timezone(&Local)
        .format("%b %d %Y @ %-I:%M%p")
        .to_string()
}

pub fn render(f: &mut Frame, state: &mut UIState<'_>) {
    match state.mode {
        UIMode::Composing => render_form(f, state),
        UIMode::Sent => render_sent(f),
        UIMode::Unlocking => render_unlock(f, state),
        UIMode::Admin => render_admin(f, state),
    }
}

fn render_form(f: &mut Frame, state: &mut UIState<'_>) {
    let area = centered_rect(70, 90, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" secret valentine thingy ")
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Intro
            Constraint::Length(3), // Recipient
            Constraint::Min(6),    // Message
            Constraint::Length(3), // Method
            Constraint::Length(3), // Contact
            Constraint::Length(2), // Status
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let intro = Paragraph::new("Send a message without them knowing :D\nDont abuse this please")
        .style(Style::default().fg(Color::Gray));
    f.render_widget(intro, chunks[0]);

    let form = &mut state.form;
    let focused = form.focused_field;

    form.recipient.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recipient Name ")
            .border_style(focus_style(focused == FormField::Recipient)),
    );
    f.render_widget(&form.recipient, chunks[1]);

    form.message.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Message ")
            .border_style(focus_style(focused == FormField::Message)),
    );
    f.render_widget(&form.message, chunks[2]);

    let (email_mark, phone_mark) = match form.contact_method {
        ContactMethod::Email => ("(•)", "( )"),
        ContactMethod::Phone => ("( )", "(•)"),
    };
    let method = Paragraph::new(format!(" {} Email   {} Phone", email_mark, phone_mark)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Contact Method [Space to Switch] ")
            .border_style(focus_style(focused == FormField::ContactMethod)),
    );
    f.render_widget(method, chunks[3]);

    let contact_title = match form.contact_method {
        ContactMethod::Email => " Recipient Email ",
        ContactMethod::Phone => " Recipient Phone ",
    };
    form.contact_value.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(contact_title)
            .border_style(focus_style(focused == FormField::ContactValue)),
    );
    f.render_widget(&form.contact_value, chunks[4]);

    if let Some(ref status) = state.status_message {
        let status_p = Paragraph::new(status.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        f.render_widget(status_p, chunks[5]);
    }

    let help = Paragraph::new("Ctrl-S Send | Tab Next Field | Ctrl-T Email/Phone | Ctrl-A Admin | Ctrl-Q Quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[6]);
}

fn render_sent(f: &mut Frame) {
    let area = centered_rect(50, 40, f.area());
    f.render_widget(Clear, area);

    let text = "Sent\n\nYour message will be delivered soon! This may take up to 5 hours since sending texts are kinda expensive tbh.\n\nPress any key to send another.";
    let sent = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" ♥ ")
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(sent, area);
}

fn render_unlock(f: &mut Frame, state: &mut UIState<'_>) {
    let area = centered_rect(40, 30, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Admin Access ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    state.password.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Password ")
            .border_style(focus_style(true)),
    );
    f.render_widget(&state.password, chunks[0]);

    if let Some(ref err) = state.auth_error {
        let err_p = Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(err_p, chunks[1]);
    }

    let footer = Paragraph::new("Enter to Unlock, Esc to go Back")
        .style(Style::default().fg(Color::Gray));
    f.render_widget(footer, chunks[2]);
}

fn render_admin(f: &mut Frame, state: &mut UIState<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15), // Filter tabs
            Constraint::Percentage(35), // Message list
            Constraint::Percentage(50), // Selected message
        ])
        .split(f.area());

    // Panel 1: Filter tabs
    let counts = filter::counts(&state.messages);
    let tab_items: Vec<ListItem> = MessageFilter::TABS
        .iter()
        .map(|tab| {
            let style = if *tab == state.filter {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} ({})", tab.title(), tab.count(&counts))).style(style)
        })
        .collect();
    let tabs = List::new(tab_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Admin Panel")
            .border_style(panel_style(false)),
    );
    f.render_widget(tabs, chunks[0]);

    // Panel 2: Message list
    let visible = state.filter.apply(&state.messages);
    let list_width = chunks[1].width.saturating_sub(4) as usize;

    let title = match state.status_message {
        Some(ref status) => format!("Messages - {}", status),
        None => "Messages".to_string(),
    };
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(panel_style(true));

    if visible.is_empty() {
        let empty_text = match state.filter {
            MessageFilter::Pending => "No pending messages",
            MessageFilter::Fulfilled => "No fulfilled messages yet",
            MessageFilter::All => "No messages yet",
        };
        let empty = Paragraph::new(empty_text)
            .block(list_block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, chunks[1]);
    } else {
        let truncate = |s: String| {
            if s.chars().count() > list_width {
                let cut: String = s.chars().take(list_width.saturating_sub(3)).collect();
                format!("{}...", cut)
            } else {
                s
            }
        };

        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let selected = i == state.selected_message_index;
                let indicator = if selected { "█" } else { " " };
                let status = if m.fulfilled { "Fulfilled" } else { "Pending" };

                let mut style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                if !m.fulfilled {
                    style = style.add_modifier(Modifier::BOLD);
                }

                let text = format!(
                    "{}{}\n{}{}\n{}{}",
                    indicator,
                    truncate(format!(" To: {}", m.recipient_name)),
                    indicator,
                    truncate(format!(" {}", format_time(m))),
                    indicator,
                    truncate(format!(" {} via {}", status, m.contact_method)),
                );
                ListItem::new(text).style(style)
            })
            .collect();

        let list = List::new(items).block(list_block);
        state
            .messages_list_state
            .select(Some(state.selected_message_index));
        f.render_stateful_widget(list, chunks[1], &mut state.messages_list_state);
    }

    // Panel 3: Details
    let detail_content = match visible.get(state.selected_message_index) {
        Some(m) => format!(
            "To: {}\nDate: {}\nStatus: {}\nContact ({}): {}\n\n{}",
            m.recipient_name,
            format_time(m),
            if m.fulfilled { "Fulfilled" } else { "Pending" },
            m.contact_method,
            m.contact_value,
            m.message,
        ),
        None => "No message selected".to_string(),
    };
    let details = Paragraph::new(detail_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Message [Space Mark Fulfilled/Pending, J/K Scroll, r Refresh, Esc Back]")
                .border_style(panel_style(false)),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0));
    f.render_widget(details, chunks[2]);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msg(id: &str, fulfilled: bool) -> Message {
        Message {
            id: id.to_string(),
            recipient_name: "Sam".to_string(),
            message: "hi".to_string(),
            contact_method: ContactMethod::Phone,
            contact_value: "555-123-4567".to_string(),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            fulfilled,
        }
    }

    #[test]
    fn test_form_draft_collects_fields() {
        let mut form = FormState::default();
        form.recipient.insert_str("Sam");
        form.message.insert_str("hi");
        form.switch_contact_method();
        form.contact_value.insert_str("sam@example.com");

        let draft = form.draft();
        assert_eq!(draft.recipient_name, "Sam");
        assert_eq!(draft.message, "hi");
        assert_eq!(draft.contact_method, ContactMethod::Email);
        assert_eq!(draft.contact_value, "sam@example.com");
    }

    #[test]
    fn test_form_reset_keeps_method() {
        let mut form = FormState::default();
        form.switch_contact_method();
        form.recipient.insert_str("Sam");
        form.focused_field = FormField::ContactValue;
        form.reset();

        assert_eq!(form.contact_method, ContactMethod::Email);
        assert_eq!(form.draft().recipient_name, "");
        assert_eq!(form.focused_field, FormField::Recipient);
    }

    #[test]
    fn test_field_cycle_skips_nothing() {
        let mut field = FormField::Recipient;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, FormField::Recipient);
        assert_eq!(FormField::Recipient.prev(), FormField::ContactValue);

        let mut form = FormState::default();
        form.focused_field = FormField::ContactMethod;
        assert!(form.focused_textarea().is_none());
    }

    #[test]
    fn test_selection_clamps_when_filtered_list_shrinks() {
        let mut state = UIState::default();
        state.messages = vec![msg("a", false), msg("b", false)];
        state.selected_message_index = 1;
        assert_eq!(state.selected_message().unwrap().id, "b");

        state.messages[1].fulfilled = true;
        state.clamp_selection();
        assert_eq!(state.selected_message_index, 0);
        assert_eq!(state.selected_message().unwrap().id, "a");

        state.set_filter(MessageFilter::Fulfilled);
        assert_eq!(state.selected_message().unwrap().id, "b");
    }

    #[test]
    fn test_detail_scroll_moves_and_resets() {
        let mut state = UIState::default();
        state.scroll_detail_up();
        assert_eq!(state.detail_scroll, 0);

        state.scroll_detail_down();
        state.scroll_detail_down();
        state.scroll_detail_up();
        assert_eq!(state.detail_scroll, 1);

        state.set_filter(MessageFilter::All);
        assert_eq!(state.detail_scroll, 0);
    }
}

use std::io;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::Event;
use crate::domain::models::ExchangeClientBox;
use crate::domain::models::Message;
use crate::domain::models::NotificationLevel;
use crate::domain::services::help_text;
use crate::domain::services::ActionsService;
use crate::domain::services::AppState;
use crate::domain::services::AppStateProps;
use crate::domain::services::EventsService;

const ACCENT: Color = Color::Rgb(0, 216, 255);
const SIDEBAR_WIDTH: u16 = 30;
const PAGE: usize = 10;

/// Wraps on character boundaries. Keeps empty lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = vec![];

    for raw in text.split('\n') {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            lines.push("".to_string());
            continue;
        }

        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }

    return lines;
}

pub fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let author_style = match message.sender {
        Author::User => Style::default().fg(Color::Magenta).bold(),
        Author::Ai => Style::default().fg(ACCENT).bold(),
    };
    let time = message
        .timestamp
        .with_timezone(&Local)
        .format("%I:%M %p")
        .to_string();

    let mut lines = vec![Line::from(vec![
        Span::styled(message.sender.label(), author_style),
        Span::styled(format!("  {time}"), Style::default().fg(Color::DarkGray)),
    ])];

    if let Some(file) = &message.file {
        lines.push(Line::styled(
            format!("[file] {} ({})", file.name, file.mime_type),
            Style::default().fg(Color::Yellow),
        ));
    }

    if !message.text.is_empty() {
        for line in wrap_text(&message.text, width) {
            lines.push(Line::raw(line));
        }
    }
    lines.push(Line::raw(""));

    return lines;
}

fn new_textarea<'a>() -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title("Message"),
    );
    textarea.set_placeholder_text("Ask STARK about your invoice, or /help");
    textarea.set_cursor_line_style(Style::default());

    return textarea;
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app_state: &AppState) {
    let items = app_state
        .sessions
        .list()
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let mut style = Style::default();
            if session.id == app_state.sessions.active_id() {
                style = style.fg(ACCENT).bold();
            }

            return ListItem::new(vec![
                Line::styled(format!("{}. {}", idx + 1, session.title), style),
                Line::styled(
                    session
                        .created_at
                        .with_timezone(&Local)
                        .format("   %-m/%-d/%Y")
                        .to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
        })
        .collect::<Vec<ListItem>>();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Chats"));
    frame.render_widget(list, area);
}

fn draw_header(frame: &mut Frame, area: Rect, app_state: &AppState) {
    let badge = if app_state.context_loaded {
        Span::styled(" INVOICE LOADED ", Style::default().bg(Color::Green).fg(Color::Black))
    } else {
        Span::styled(" NO INVOICE ", Style::default().bg(Color::DarkGray).fg(Color::White))
    };

    let header = Line::from(vec![
        Span::styled(" STARK ", Style::default().fg(ACCENT).bold()),
        badge,
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_messages(frame: &mut Frame, area: Rect, app_state: &AppState) {
    let title = app_state
        .sessions
        .active()
        .map(|e| return e.title.to_string())
        .unwrap_or_default();
    let block = Block::default().borders(Borders::ALL).title(title);

    if app_state.help_visible {
        let help = Paragraph::new(help_text())
            .block(block.title_bottom("/help to close"))
            .wrap(Wrap { trim: false });
        frame.render_widget(help, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines = app_state
        .sessions
        .active()
        .map(|session| {
            return session
                .messages
                .iter()
                .flat_map(|message| return message_lines(message, inner_width))
                .collect::<Vec<Line>>();
        })
        .unwrap_or_default();

    let max_offset = lines.len().saturating_sub(inner_height);
    let top = max_offset.saturating_sub(app_state.scroll.min(max_offset));
    let top = u16::try_from(top).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((top, 0)), area);
}

fn draw_status(frame: &mut Frame, area: Rect, app_state: &AppState) {
    let status = if let Some(notification) = &app_state.notification {
        let color = match notification.level {
            NotificationLevel::Info => ACCENT,
            NotificationLevel::Error => Color::Red,
        };
        Line::styled(notification.text.to_string(), Style::default().fg(color))
    } else if app_state.is_sending() {
        Line::styled("Sending...", Style::default().fg(Color::Yellow))
    } else {
        Line::styled(
            "Enter to send, CTRL+O for a new line, /help for commands",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(status), area);
}

fn draw(frame: &mut Frame, app_state: &AppState, textarea: &TextArea) {
    let [sidebar_area, main_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .areas(frame.area());
    let [header_area, messages_area, input_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .areas(main_area);

    draw_sidebar(frame, sidebar_area, app_state);
    draw_header(frame, header_area, app_state);
    draw_messages(frame, messages_area, app_state);
    frame.render_widget(textarea, input_area);
    draw_status(frame, status_area, app_state);
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    props: AppStateProps,
    action_tx: mpsc::UnboundedSender<Action>,
    event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(props).await;
    let mut textarea = new_textarea();
    let mut events = EventsService::new(event_rx);

    action_tx.send(Action::Initialize)?;

    loop {
        terminal.draw(|frame| draw(frame, &app_state, &textarea))?;

        match events.next().await? {
            Event::KeyboardCTRLC => break,
            Event::KeyboardCTRLN => app_state.new_session().await,
            Event::KeyboardCTRLO => textarea.insert_newline(),
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::KeyboardPaste(text) => {
                textarea.insert_str(text);
            }
            Event::KeyboardEnter => {
                let input_str = textarea.lines().join("\n");
                let (should_break, should_continue) = app_state
                    .handle_slash_commands(&input_str, &action_tx)
                    .await?;
                if should_break {
                    break;
                }
                if should_continue {
                    textarea = new_textarea();
                    continue;
                }

                if app_state.submit(&input_str, None, &action_tx).await? {
                    textarea = new_textarea();
                }
            }
            Event::UITick => app_state.expire_notification(Instant::now()),
            Event::UIScrollUp => app_state.scroll_up(1),
            Event::UIScrollDown => app_state.scroll_down(1),
            Event::UIScrollPageUp => app_state.scroll_up(PAGE),
            Event::UIScrollPageDown => app_state.scroll_down(PAGE),
            event => app_state.handle_event(event).await,
        }
    }

    return Ok(());
}

pub async fn start_loop(client: ExchangeClientBox, props: AppStateProps) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let worker = tokio::spawn(async move {
        return ActionsService::start(client, event_tx, &mut action_rx).await;
    });

    let res = run_loop(&mut terminal, props, action_tx, event_rx).await;

    worker.abort();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return res;
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        DisableMouseCapture
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::FileDescriptor;

    #[test]
    fn test_wrap_text_splits_long_lines() {
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_text("ab\n\ncd", 10), vec!["ab", "", "cd"]);
        assert_eq!(wrap_text("héllo", 2), vec!["hé", "ll", "o"]);
        assert_eq!(wrap_text("abc", 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_message_lines_include_file_line() {
        let message = Message::with_file(
            Author::User,
            "",
            FileDescriptor {
                name: "invoice.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
            },
        );

        let lines = message_lines(&message, 40);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].to_string(), "[file] invoice.pdf (application/pdf)");
    }

    #[test]
    fn test_message_lines_wrap_text() {
        let message = Message::new(Author::Ai, "The total due is 42 EUR");

        let lines = message_lines(&message, 10);

        assert!(lines[0].to_string().starts_with("STARK"));
        assert_eq!(lines[1].to_string(), "The total ");
        assert_eq!(lines.len(), 5);
    }
}

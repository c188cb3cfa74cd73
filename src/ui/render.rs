// Drawing only. Everything shown comes in through `Screen`, nothing here touches
// the session or the catalog.

use super::navigation::ListEntry;
use crate::audio::{LoopMode, RateTone, SessionSnapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// What the player panel currently shows.
pub enum PlayerPane<'a> {
    /// Nothing to play in this view.
    Empty,
    Loading { title: &'a str },
    Unavailable { title: &'a str, reason: &'a str },
    Session(&'a SessionSnapshot),
}

pub struct Screen<'a> {
    pub breadcrumbs: &'a [String],
    pub list_title: &'a str,
    pub entries: &'a [ListEntry],
    /// Image locator of the playing item, shown in place of the picture.
    pub image: Option<&'a str>,
    pub description: Option<&'a str>,
    pub player: PlayerPane<'a>,
    pub status: &'a str,
    pub show_help: bool,
    pub show_key_hints: bool,
}

/// Draws one frame and returns where the seek bar ended up, if one was drawn.
pub fn draw(f: &mut Frame, screen: &Screen, list_state: &mut ListState) -> Option<Rect> {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Breadcrumbs
            Constraint::Min(6),    // List + media
            Constraint::Length(6), // Player
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_header(f, chunks[0]);
    render_breadcrumbs(f, chunks[1], screen.breadcrumbs);

    if screen.entries.is_empty() {
        render_media(f, chunks[2], screen.image, screen.description);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);
        render_list(f, body[0], screen.list_title, screen.entries, list_state);
        render_media(f, body[1], screen.image, screen.description);
    }

    let gauge = render_player(f, chunks[3], &screen.player, screen.show_key_hints);
    render_status_bar(f, chunks[4], screen.status);

    if screen.show_help {
        render_help_overlay(f, size);
    }

    gauge
}

fn render_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("🕉  Vedam - Lesson Practice")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(title, area);
}

fn render_breadcrumbs(f: &mut Frame, area: Rect, breadcrumbs: &[String]) {
    let last = breadcrumbs.len().saturating_sub(1);
    let mut spans = vec![Span::raw(" ")];
    for (i, crumb) in breadcrumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == last {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(crumb.clone(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[ListEntry],
    list_state: &mut ListState,
) {
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let mut lines = vec![Line::from(Span::styled(
                entry.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))];
            if !entry.detail.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", entry.detail),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("► ");

    f.render_stateful_widget(list, area, list_state);
}

fn render_media(f: &mut Frame, area: Rect, image: Option<&str>, description: Option<&str>) {
    let mut lines = Vec::new();
    if let Some(image) = image {
        lines.push(Line::from(Span::styled("🖼  ", Style::default().fg(Color::Magenta))));
        lines.push(Line::from(Span::styled(
            image.to_string(),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        lines.push(Line::from(description.to_string()));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Select a lesson to begin",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let media = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Text"))
        .wrap(Wrap { trim: true });
    f.render_widget(media, area);
}

fn render_player(
    f: &mut Frame,
    area: Rect,
    player: &PlayerPane,
    show_key_hints: bool,
) -> Option<Rect> {
    let block = Block::default().borders(Borders::ALL).title("Player");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Seek bar
            Constraint::Length(1), // State, loop, speed
            Constraint::Length(1), // Key hints
        ])
        .split(inner);

    let snapshot = match player {
        PlayerPane::Empty => {
            let idle = Paragraph::new("Choose a sub-unit or panasa to practise")
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(idle, rows[0]);
            return None;
        }
        PlayerPane::Loading { title } => {
            f.render_widget(title_line(title), rows[0]);
            let loading =
                Paragraph::new("Loading audio...").style(Style::default().fg(Color::Yellow));
            f.render_widget(loading, rows[1]);
            return None;
        }
        PlayerPane::Unavailable { title, reason } => {
            f.render_widget(title_line(title), rows[0]);
            let unavailable = Paragraph::new(format!("Audio unavailable: {}", reason))
                .style(Style::default().fg(Color::Red));
            f.render_widget(unavailable, rows[1]);
            return None;
        }
        PlayerPane::Session(snapshot) => snapshot,
    };

    f.render_widget(title_line(&snapshot.title), rows[0]);

    let progress_color = if snapshot.playing { Color::Green } else { Color::Yellow };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(progress_color).add_modifier(Modifier::BOLD))
        .ratio(snapshot.progress())
        .label(snapshot.time_label());
    f.render_widget(gauge, rows[1]);

    let (symbol, state_text, state_color) = match (&snapshot.fault, snapshot.playing) {
        (Some(_), _) => ("⚠", "Error", Color::Red),
        (None, true) => ("▶", "Playing", Color::Green),
        (None, false) if !snapshot.ready => ("…", "Loading", Color::Yellow),
        (None, false) => ("⏸", "Paused", Color::Yellow),
    };
    let loop_color = match snapshot.loop_mode {
        LoopMode::Off => Color::DarkGray,
        LoopMode::Infinite => Color::Green,
        LoopMode::FiveTimes => Color::Magenta,
    };
    let rate_color = match snapshot.rate.tone() {
        RateTone::Slower => Color::Cyan,
        RateTone::Normal => Color::White,
        RateTone::Faster => Color::LightRed,
    };

    let mut status = vec![
        Span::styled(symbol, Style::default().fg(state_color).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(state_text, Style::default().fg(state_color)),
        Span::raw(" | "),
        Span::styled(snapshot.loop_label(), Style::default().fg(loop_color)),
        Span::raw(" | "),
        Span::styled("Speed: ", Style::default().fg(Color::Gray)),
        Span::styled(
            snapshot.rate.to_string(),
            Style::default().fg(rate_color).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(fault) = &snapshot.fault {
        status.push(Span::raw(" | "));
        status.push(Span::styled(fault.clone(), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(Line::from(status)), rows[2]);

    if show_key_hints {
        let hints = Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw("=Play/Pause "),
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::raw("=Restart "),
            Span::styled("l", Style::default().fg(Color::Yellow)),
            Span::raw("=Loop "),
            Span::styled("s", Style::default().fg(Color::Yellow)),
            Span::raw("=Speed "),
            Span::styled("[ ]", Style::default().fg(Color::Yellow)),
            Span::raw("=Prev/Next "),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::raw("=Help"),
        ]);
        f.render_widget(Paragraph::new(hints), rows[3]);
    }

    Some(rows[1])
}

fn title_line(title: &str) -> Paragraph<'static> {
    Paragraph::new(format!("♪ {}", title))
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
}

fn render_status_bar(f: &mut Frame, area: Rect, status: &str) {
    let status = Paragraph::new(status.to_string())
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let help_text = vec![
        Line::from(Span::styled(
            "Vedam Help",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Navigation:", heading)),
        Line::from("  ↑/↓           Move selection"),
        Line::from("  Enter         Open lesson / anuvakam / panasa"),
        Line::from("  Backspace     Up one level"),
        Line::from("  h             Home"),
        Line::from("  [ / ]         Previous / next anuvakam (starts playing)"),
        Line::from(""),
        Line::from(Span::styled("Playback:", heading)),
        Line::from("  Space         Play/Pause"),
        Line::from("  r             Restart"),
        Line::from("  l             Loop: off → ∞ → 5×"),
        Line::from("  s             Speed: 0.5× → 0.75× → 1× → 1.25× → 1.5×"),
        Line::from("  0-9           Jump to 0%..90%"),
        Line::from("  ←/→           Seek back / forward 5%"),
        Line::from("  click bar     Seek"),
        Line::from(""),
        Line::from("  q / Esc       Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(Color::Yellow),
        )),
    ];

    f.render_widget(Clear, popup_area);

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black).fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
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

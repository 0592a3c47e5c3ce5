/*!
 * Terminal rendering for shelfview
 *
 * Pure presentation: draw functions read the controller state and produce
 * widgets, they never mutate it. All wording for empty, loading, and error
 * states lives here.
 */

use once_cell::sync::Lazy;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, RootState};
use crate::state::{ViewMode, VisibleRow};
use crate::storage::Theme;
use crate::types::{Entry, EntryKind};

/// Keyboard command reference shown by the help overlay
static KEY_HELP: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("/", "Focus search"),
        ("Esc", "Clear search / close help"),
        ("Up/Down", "Navigate entries"),
        ("Enter", "Open entry / toggle directory"),
        ("s", "Star or unstar focused entry"),
        ("f", "Favorites view"),
        ("v", "All entries view"),
        ("c", "Copy focused file contents"),
        ("y", "Copy focused file link"),
        ("t", "Toggle theme"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ]
});

/// Resolved colors for the active theme
struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    star: Color,
    error: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            star: Color::Yellow,
            error: Color::Red,
        },
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            star: Color::Magenta,
            error: Color::Red,
        },
    }
}

/// Draw one frame from the controller state
pub fn draw(frame: &mut Frame, app: &App) {
    let colors = palette(app.theme);
    frame.render_widget(
        Block::new().style(Style::new().bg(colors.bg).fg(colors.fg)),
        frame.area(),
    );

    let [header, search, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, app, header, &colors);
    draw_search(frame, app, search, &colors);

    match &app.root {
        RootState::Loading => draw_notice(frame, body, &colors, "Loading shelf..."),
        RootState::Failed(message) => draw_root_error(frame, body, &colors, message),
        RootState::Ready => draw_rows(frame, app, body, &colors),
    }

    draw_footer(frame, app, footer, &colors);

    if app.show_help {
        draw_help(frame, &colors);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, colors: &Palette) {
    let tab = |label: String, active: bool| {
        if active {
            Span::styled(
                label,
                Style::new().fg(colors.accent).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::new().fg(colors.muted))
        }
    };

    let line = Line::from(vec![
        Span::styled(
            "shelfview ",
            Style::new().fg(colors.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({}) ", app.config.base_url), Style::new().fg(colors.muted)),
        tab("[all]".to_string(), app.state.mode == ViewMode::All),
        Span::raw(" "),
        tab(
            format!("[favorites {}]", app.favorites.len()),
            app.state.mode == ViewMode::Favorites,
        ),
        Span::styled(
            format!(
                "  indexed {} entries from {} dirs",
                app.index.len(),
                app.crawled_dirs
            ),
            Style::new().fg(colors.muted),
        ),
    ]);

    let block = Block::new()
        .borders(Borders::BOTTOM)
        .border_style(Style::new().fg(colors.muted));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_search(frame: &mut Frame, app: &App, area: Rect, colors: &Palette) {
    let border = if app.search_focused {
        Style::new().fg(colors.accent)
    } else {
        Style::new().fg(colors.muted)
    };

    let content = if app.state.search_term.is_empty() && !app.search_focused {
        Line::from(Span::styled(
            "Press / to search files and entries",
            Style::new().fg(colors.muted),
        ))
    } else {
        let cursor = if app.search_focused { "█" } else { "" };
        Line::from(vec![
            Span::styled(app.state.search_term.clone(), Style::new().fg(colors.fg)),
            Span::styled(cursor, Style::new().fg(colors.accent)),
        ])
    };

    let block = Block::bordered().border_style(border).title(" Search ");
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_rows(frame: &mut Frame, app: &App, area: Rect, colors: &Palette) {
    if app.rows.is_empty() {
        // The two empty states are deliberately distinct: an empty favorites
        // view invites starring, an empty search result reports a miss.
        let message = if app.state.mode == ViewMode::Favorites && app.state.search_term.is_empty() {
            "No favorite entries yet\nStar entries with s to add them to your favorites"
        } else {
            "No entries or files found"
        };
        draw_notice(frame, area, colors, message);
        return;
    }

    let items: Vec<ListItem> = app.rows.iter().map(|row| row_item(row, app, colors)).collect();

    let block = Block::bordered()
        .border_style(Style::new().fg(colors.muted))
        .title(format!(" {} ", app.state.mode));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(colors.accent).fg(colors.bg));

    let mut list_state = ListState::default();
    list_state.select(app.state.focused);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn row_item<'a>(row: &'a VisibleRow, app: &App, colors: &Palette) -> ListItem<'a> {
    match row {
        VisibleRow::Entry { entry, depth } => entry_item(entry, *depth, app, colors),
        VisibleRow::Loading { depth } => ListItem::new(Line::from(Span::styled(
            format!("{}Loading files...", indent(*depth)),
            Style::new().fg(colors.muted).add_modifier(Modifier::ITALIC),
        ))),
        VisibleRow::Error { message, depth } => ListItem::new(Line::from(Span::styled(
            format!("{}Error loading files: {}", indent(*depth), message),
            Style::new().fg(colors.error),
        ))),
        VisibleRow::Empty { depth } => ListItem::new(Line::from(Span::styled(
            format!("{}No files found", indent(*depth)),
            Style::new().fg(colors.muted),
        ))),
    }
}

fn entry_item<'a>(entry: &'a Entry, depth: usize, app: &App, colors: &Palette) -> ListItem<'a> {
    let mut spans = vec![Span::raw(indent(depth))];

    if depth == 0 {
        let star = if app.favorites.contains(&entry.name) {
            Span::styled("★ ", Style::new().fg(colors.star))
        } else {
            Span::styled("☆ ", Style::new().fg(colors.muted))
        };
        spans.push(star);
    }

    let marker = match entry.kind {
        EntryKind::Dir => {
            if app.state.is_expanded(&entry.path) {
                "▾ "
            } else {
                "▸ "
            }
        }
        EntryKind::File => "  ",
        EntryKind::Link => "↗ ",
    };
    spans.push(Span::styled(marker, Style::new().fg(colors.accent)));

    spans.push(Span::styled(entry.name.as_str(), Style::new().fg(colors.fg)));
    spans.push(Span::styled(
        format!("  {}", entry.kind),
        Style::new().fg(colors.muted),
    ));

    ListItem::new(Line::from(spans))
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect, colors: &Palette) {
    let line = match &app.toast {
        Some((message, _)) => Line::from(Span::styled(
            message.clone(),
            Style::new().fg(colors.bg).bg(colors.accent),
        )),
        None => Line::from(Span::styled(
            " / search   f favorites   s star   Enter open   ? help   q quit",
            Style::new().fg(colors.muted),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_notice(frame: &mut Frame, area: Rect, colors: &Palette, message: &str) {
    let block = Block::bordered().border_style(Style::new().fg(colors.muted));
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::new().fg(colors.muted))
            .centered()
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_root_error(frame: &mut Frame, area: Rect, colors: &Palette, message: &str) {
    let block = Block::bordered()
        .border_style(Style::new().fg(colors.error))
        .title(" Error ");
    frame.render_widget(
        Paragraph::new(format!("Error loading shelf: {}", message))
            .style(Style::new().fg(colors.error))
            .centered()
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_help(frame: &mut Frame, colors: &Palette) {
    let area = centered_rect(frame.area(), 44, KEY_HELP.len() as u16 + 2);
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = KEY_HELP
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!(" {:>8}  ", key), Style::new().fg(colors.accent)),
                Span::styled(*action, Style::new().fg(colors.fg)),
            ])
        })
        .collect();

    let block = Block::bordered()
        .border_style(Style::new().fg(colors.accent))
        .title(" Keyboard shortcuts ")
        .style(Style::new().bg(colors.bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

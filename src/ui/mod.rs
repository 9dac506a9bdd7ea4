use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::state::{AppState, EditorField, FocusPane, OverlayState};
use crate::app::TextField;
use crate::config::themes::Palette;
use crate::editor::Binding;
use crate::picker::{DatePicker, TagPicker, TagPickerMode};

const WEEKDAY_HEADER: &str = "Mo Tu We Th Fr Sa Su";

pub fn draw_app(frame: &mut Frame, state: &AppState, list_state: &mut ListState, palette: &Palette) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(vertical[0]);

    draw_entry_list(frame, state, list_state, palette, columns[0]);
    draw_editor(frame, state, palette, columns[1]);

    let status = Paragraph::new(build_status_line(state, palette))
        .style(Style::default().fg(palette.muted));
    frame.render_widget(status, vertical[1]);

    render_overlay(frame, state, palette);
}

fn focus_style(active: bool, palette: &Palette) -> Style {
    if active {
        Style::default().fg(palette.accent)
    } else {
        Style::default()
    }
}

fn draw_entry_list(
    frame: &mut Frame,
    state: &AppState,
    list_state: &mut ListState,
    palette: &Palette,
    area: Rect,
) {
    let rows = state.rows();
    let selected_date = state.editor().selected_date();
    let editor_visible = state.editor().is_visible();

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut title_spans = Vec::new();
        if editor_visible && row.date == selected_date {
            title_spans.push(Span::styled(
                "✎ ",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        title_spans.push(Span::styled(
            row.date.to_string(),
            Style::default().fg(palette.muted),
        ));
        title_spans.push(Span::raw("  "));
        let title = if row.title.is_empty() {
            "(untitled)"
        } else {
            row.title.as_str()
        };
        title_spans.push(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let mut lines = vec![Line::from(title_spans)];
        if let Some(tag_line) = render_tag_line(&row.tags, palette) {
            lines.push(tag_line);
        }
        for preview in row.preview.lines() {
            lines.push(Line::from(Span::raw(preview.to_string())));
        }
        items.push(ListItem::new(lines));
    }
    if items.is_empty() {
        let hint = if state.list().has_filter() {
            "No entries carry every selected tag. Press `F` to clear the filter."
        } else {
            "No entries yet. Press `a` to write today's."
        };
        items.push(ListItem::new(hint));
    }

    let mut title_spans = vec![Span::raw("Entries")];
    for tag in state.list().filter() {
        title_spans.push(Span::raw(" "));
        title_spans.push(Span::styled(
            format!("[#{tag}]"),
            Style::default().fg(palette.tag),
        ));
    }
    title_spans.push(Span::styled(
        " (a: add)",
        Style::default().fg(palette.muted),
    ));

    let list = List::new(items)
        .block(
            Block::default()
                .title(Line::from(title_spans))
                .borders(Borders::ALL)
                .border_style(focus_style(state.focus == FocusPane::List, palette)),
        )
        .highlight_style(
            Style::default()
                .bg(palette.highlight_bg)
                .fg(palette.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, list_state);
}

fn draw_editor(frame: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let editor = state.editor();
    let focused = state.focus == FocusPane::Editor;
    let block = Block::default()
        .title("Diary")
        .borders(Borders::ALL)
        .border_style(focus_style(focused, palette));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if !editor.is_visible() {
        let hint = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from("Select an entry with Enter, or press `a` to write today."),
        ]))
        .style(Style::default().fg(palette.muted))
        .wrap(Wrap { trim: false });
        frame.render_widget(hint, inner);
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(header_lines(state, palette)), sections[0]);

    let field_block = |label: &'static str, field: EditorField| {
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(focus_style(focused && state.field == field, palette))
    };

    let title = Paragraph::new(state.title_field().as_str().to_string())
        .block(field_block("Title", EditorField::Title));
    frame.render_widget(title, sections[1]);

    let tags = render_tag_line(editor.tags(), palette)
        .unwrap_or_else(|| Line::from(Span::styled("no tags", Style::default().fg(palette.muted))));
    frame.render_widget(
        Paragraph::new(tags).block(field_block("Tags (type to add)", EditorField::Tags)),
        sections[2],
    );

    let content_area = sections[3];
    let visible_rows = content_area.height.saturating_sub(2);
    let (line, _) = state.content_field().cursor_line_column();
    let scroll = (line as u16).saturating_sub(visible_rows.saturating_sub(1));
    let content = Paragraph::new(state.content_field().as_str().to_string())
        .block(field_block("Content", EditorField::Content))
        .scroll((scroll, 0));
    frame.render_widget(content, content_area);

    if !focused || state.has_overlay() {
        return;
    }
    let cursor = match state.field {
        EditorField::Title => Some(cursor_position(state.title_field(), sections[1], 0)),
        EditorField::Content => Some(cursor_position(state.content_field(), content_area, scroll)),
        EditorField::Tags => None,
    };
    if let Some((x, y)) = cursor {
        frame.set_cursor(x, y);
    }
}

fn header_lines(state: &AppState, palette: &Palette) -> Vec<Line<'static>> {
    let editor = state.editor();
    let date = editor.selected_date();
    let next_style = if editor.can_go_next() {
        Style::default().fg(palette.accent)
    } else {
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::DIM)
    };
    let binding = match editor.binding() {
        Binding::Bound => Span::styled("saved", Style::default().fg(palette.tag)),
        Binding::Unbound => Span::styled(
            "empty, start typing",
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::ITALIC),
        ),
    };
    vec![
        Line::from(vec![
            Span::styled("◀ yesterday", Style::default().fg(palette.accent)),
            Span::raw("   "),
            Span::styled(
                date.long_label(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("tomorrow ▶", next_style),
        ]),
        Line::from(vec![
            Span::styled(date.to_string(), Style::default().fg(palette.muted)),
            Span::raw(" • "),
            binding,
        ]),
    ]
}

/// Screen cell for the cursor of `field` drawn inside a bordered `area`.
fn cursor_position(field: &TextField, area: Rect, scroll: u16) -> (u16, u16) {
    let before = &field.as_str()[..field.cursor()];
    let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    let column = UnicodeWidthStr::width(&before[line_start..]) as u16;
    let line = before.matches('\n').count() as u16;
    let max_x = area.x + area.width.saturating_sub(2);
    let max_y = area.y + area.height.saturating_sub(2);
    let x = (area.x + 1 + column).min(max_x);
    let y = (area.y + 1 + line.saturating_sub(scroll)).min(max_y);
    (x, y)
}

fn build_status_line(state: &AppState, palette: &Palette) -> Text<'static> {
    let total = state.store().len();
    let visible = state.list().visible_len(state.store());
    let focus = match state.focus {
        FocusPane::List => "List",
        FocusPane::Editor => "Editor",
    };

    let mut spans = vec![
        Span::raw(format!("Entries: {total}")),
        Span::raw(" | Showing: "),
        Span::styled(
            visible.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Focus: "),
        Span::styled(focus, Style::default().add_modifier(Modifier::BOLD)),
    ];

    if state.list().has_filter() {
        spans.push(Span::raw(" | Filter:"));
        for tag in state.list().filter() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("[{tag}]"),
                Style::default().fg(palette.tag),
            ));
        }
    }

    if state.editor().is_visible() {
        let binding = match state.editor().binding() {
            Binding::Bound => "bound",
            Binding::Unbound => "unbound",
        };
        spans.push(Span::raw(format!(
            " | Day: {} ({binding})",
            state.editor().selected_date()
        )));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(message) = &state.status_message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(palette.warning),
        )));
    }
    Text::from(lines)
}

fn render_tag_line(tags: &[String], palette: &Palette) -> Option<Line<'static>> {
    if tags.is_empty() {
        return None;
    }
    let base_style = Style::default().fg(palette.tag);
    let mut spans = Vec::new();
    for (idx, tag) in tags.iter().enumerate() {
        spans.push(Span::styled(format!("#{tag}"), base_style));
        if idx + 1 < tags.len() {
            spans.push(Span::raw(" "));
        }
    }
    Some(Line::from(spans))
}

fn render_overlay(frame: &mut Frame, state: &AppState, palette: &Palette) {
    match state.overlay() {
        Some(OverlayState::DatePicker(picker)) => {
            let area = centered_rect(40, 50, frame.size());
            frame.render_widget(Clear, area);
            let paragraph = Paragraph::new(calendar_lines(state, picker, palette)).block(
                Block::default()
                    .title("Pick a day")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.accent)),
            );
            frame.render_widget(paragraph, area);
        }
        Some(OverlayState::TagPicker(picker)) => {
            let area = centered_rect(50, 60, frame.size());
            frame.render_widget(Clear, area);
            render_tag_picker(frame, picker, palette, area);
        }
        None => {}
    }
}

fn calendar_lines(state: &AppState, picker: &DatePicker, palette: &Palette) -> Text<'static> {
    let cursor = picker.cursor();
    let date = cursor.as_date();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", date.month(), date.year()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            WEEKDAY_HEADER,
            Style::default().fg(palette.muted),
        )),
    ];
    for week in picker.month_grid() {
        let mut spans = Vec::with_capacity(14);
        for (idx, day) in week.iter().enumerate() {
            let cell = match day {
                Some(day) => {
                    let mut style = Style::default();
                    if state.store().contains(*day) {
                        style = style.fg(palette.tag).add_modifier(Modifier::BOLD);
                    }
                    if !picker.is_selectable(*day) {
                        style = Style::default()
                            .fg(palette.muted)
                            .add_modifier(Modifier::DIM);
                    }
                    if *day == cursor {
                        style = Style::default()
                            .bg(palette.highlight_bg)
                            .fg(palette.highlight_fg)
                            .add_modifier(Modifier::BOLD);
                    }
                    Span::styled(format!("{:>2}", day.as_date().day()), style)
                }
                None => Span::raw("  "),
            };
            spans.push(cell);
            if idx < 6 {
                spans.push(Span::raw(" "));
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "arrows move • PgUp/PgDn month • t today • Enter pick • Esc cancel",
        Style::default().fg(palette.muted),
    )));
    Text::from(lines)
}

fn render_tag_picker(frame: &mut Frame, picker: &TagPicker, palette: &Palette, area: Rect) {
    let title = match picker.mode() {
        TagPickerMode::Assign => "Tags for this day",
        TagPickerMode::Filter => "Filter by tags",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(4)])
        .split(inner);

    let mut items: Vec<ListItem> = picker
        .items()
        .iter()
        .map(|item| {
            let marker = if item.selected { "[x] " } else { "[ ] " };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("#{}", item.option.label),
                    Style::default().fg(palette.tag),
                ),
            ]))
        })
        .collect();
    if items.is_empty() {
        items.push(ListItem::new("No tags yet."));
    }
    let mut list_state = ListState::default();
    if !picker.items().is_empty() && !picker.is_typing() {
        list_state.select(Some(picker.cursor()));
    }
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(palette.highlight_bg)
                .fg(palette.highlight_fg),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, sections[0], &mut list_state);

    let mut footer = Vec::new();
    match picker.input() {
        Some(input) => {
            footer.push(Line::from(vec![
                Span::styled("› ", Style::default().fg(palette.accent)),
                Span::raw(input.to_string()),
                Span::styled("▌", Style::default().fg(palette.accent)),
            ]));
            let suggestions: Vec<String> = picker
                .suggestions()
                .iter()
                .map(|option| format!("#{}", option.label))
                .collect();
            if !suggestions.is_empty() {
                footer.push(Line::from(Span::styled(
                    suggestions.join(" "),
                    Style::default().fg(palette.tag),
                )));
            }
            let hint = match picker.mode() {
                TagPickerMode::Assign => "Enter add or create • Esc stop typing",
                TagPickerMode::Filter => "Enter add filter • Esc stop typing",
            };
            footer.push(Line::from(Span::styled(
                hint,
                Style::default().fg(palette.muted),
            )));
        }
        None => {
            footer.push(Line::from(Span::styled(
                "Space toggle • / type • Enter/Esc close",
                Style::default().fg(palette.muted),
            )));
        }
    }
    frame.render_widget(
        Paragraph::new(footer).wrap(Wrap { trim: false }),
        sections[1],
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryDate;
    use crate::store::EntryStore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn date(s: &str) -> EntryDate {
        s.parse().expect("valid date")
    }

    fn render(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 34)).expect("terminal");
        let mut list_state = ListState::default();
        list_state.select(Some(state.list().cursor()));
        terminal
            .draw(|frame| draw_app(frame, state, &mut list_state, &Palette::default()))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn list_pane_shows_newest_entry_first() {
        let state = AppState::new(EntryStore::with_samples(), date("2024-06-25"), 1);
        let screen = render(&state);
        assert!(screen.contains("2024-06-25  Deploying My First"));
        assert!(screen.contains("Select an entry with Enter"));
        assert!(screen.contains("Entries: 6 | Showing: 6"));
    }

    #[test]
    fn editor_header_names_the_day() {
        let mut state = AppState::new(EntryStore::with_samples(), date("2024-06-25"), 1);
        state.activate_highlighted();
        let screen = render(&state);
        assert!(screen.contains("◀ yesterday   Tuesday, June 25 2024   tomorrow ▶"));
        assert!(screen.contains("Day: 2024-06-25 (bound)"));
        assert!(screen.contains("#achievement"));
    }

    #[test]
    fn date_picker_draws_month_grid() {
        let mut state = AppState::new(EntryStore::new(), date("2024-06-25"), 1);
        state.add_entry();
        let screen = render(&state);
        assert!(screen.contains("June 2024"));
        assert!(screen.contains(WEEKDAY_HEADER));
        assert!(screen.contains("24 25 26 27 28 29 30"));
    }

    #[test]
    fn empty_store_hints_at_adding() {
        let state = AppState::new(EntryStore::new(), date("2024-06-25"), 1);
        let screen = render(&state);
        assert!(screen.contains("No entries yet. Press `a` to write today's."));
    }
}

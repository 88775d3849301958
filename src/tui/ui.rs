use std::borrow::Cow;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Cell, Padding, Paragraph, Row, Table, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::config::SelectionStyle;
use crate::core::page::Page;
use crate::core::state::App;
use crate::core::table::TableData;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ActionModal, HelpOverlay, WaitOverlay};

pub fn draw_ui(frame: &mut Frame, app: &mut App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let footer_height = if app.footer_text.trim().is_empty() { 0 } else { 2 };
    let layout = Layout::vertical([Min(0), Length(1), Length(footer_height)]);
    let [table_area, _, footer_area] = layout.areas(frame.area());

    draw_table(frame, table_area, app, tui);

    if footer_height > 0 {
        let footer = Paragraph::new(app.footer_text.as_str())
            .wrap(Wrap { trim: true })
            .block(Block::default().padding(Padding::horizontal(1)));
        frame.render_widget(footer, footer_area);
    }

    // Overlays, back to front
    let area = frame.area();
    let pages: Vec<Page> = app.pages.iter().collect();
    for page in pages {
        match page {
            Page::Primary => {}
            Page::Secondary => WaitOverlay.render(frame, area),
            Page::Help => HelpOverlay::new(&app.help_text).render(frame, area),
            Page::Action => {
                if let Some(modal) = app.transition.as_mut() {
                    ActionModal::new(modal).render(frame, area);
                }
            }
        }
    }
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let data = &app.data;
    // Header takes one line
    tui.page_rows = usize::from(area.height.saturating_sub(1)).max(1);
    if data.column_count() == 0 {
        return;
    }

    let widths = column_widths(data, tui.column_padding, tui.max_column_width);
    let (offset, columns) = visible_columns(
        &widths,
        tui.fixed_columns,
        app.selection.col(),
        tui.col_offset,
        area.width,
    );
    tui.col_offset = offset;

    let pad = " ".repeat(usize::from(tui.column_padding));
    let header_style = Style::default()
        .fg(Color::White)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(columns.iter().map(|&c| {
        Cell::from(format!(
            "{pad}{}",
            truncate(&data.header()[c], tui.max_column_width)
        ))
    }))
    .style(header_style);

    let rows = data.rows().iter().skip(1).map(|cells| {
        Row::new(columns.iter().map(|&c| {
            Cell::from(format!(
                "{pad}{}{pad}",
                truncate(&cells[c], tui.max_column_width)
            ))
        }))
    });

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|&c| Constraint::Length(widths[c]))
        .collect();

    let table = Table::new(rows, constraints)
        .header(header)
        .column_spacing(0)
        .row_highlight_style(tui.selection_style);

    tui.table_state
        .select(app.selection.row().map(|row| row.saturating_sub(1)));
    frame.render_stateful_widget(table, area, &mut tui.table_state);
}

/// Display width of each column: the widest cell, capped at `max_width`,
/// plus padding on both sides.
pub(crate) fn column_widths(data: &TableData, padding: u16, max_width: u16) -> Vec<u16> {
    let mut widths = vec![0usize; data.column_count()];
    for row in data.rows() {
        for (c, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(c) {
                *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
            }
        }
    }
    widths
        .into_iter()
        .map(|w| {
            let w = u16::try_from(w).unwrap_or(u16::MAX).min(max_width);
            w.saturating_add(padding.saturating_mul(2))
        })
        .collect()
}

/// Picks which columns fit in `available` cells.
///
/// The first `fixed` columns always show. The rest scroll horizontally:
/// `offset` is how many scrollable columns are hidden on the left, adjusted
/// so the selected column is on screen. Returns the adjusted offset and the
/// visible column indices in display order.
pub(crate) fn visible_columns(
    widths: &[u16],
    fixed: usize,
    selected: Option<usize>,
    offset: usize,
    available: u16,
) -> (usize, Vec<usize>) {
    let fixed = fixed.min(widths.len());
    let scrollable = widths.len() - fixed;
    let mut offset = offset.min(scrollable.saturating_sub(1));

    let fixed_width: u32 = widths[..fixed].iter().map(|&w| u32::from(w)).sum();
    let available = u32::from(available);

    if let Some(sel) = selected.filter(|&sel| sel >= fixed && sel < widths.len()) {
        let sel = sel - fixed;
        if sel < offset {
            offset = sel;
        }
        // Scroll right until the selected column fits
        while offset < sel {
            let span: u32 = widths[fixed + offset..=fixed + sel]
                .iter()
                .map(|&w| u32::from(w))
                .sum();
            if fixed_width + span <= available {
                break;
            }
            offset += 1;
        }
    }

    let mut columns: Vec<usize> = Vec::with_capacity(widths.len());
    let mut used = 0u32;
    for c in (0..fixed).chain(fixed + offset..widths.len()) {
        let w = u32::from(widths[c]);
        if used + w > available && !columns.is_empty() {
            break;
        }
        used += w;
        columns.push(c);
    }
    (offset, columns)
}

/// Cuts `s` to `max_width` display cells, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max_width: u16) -> Cow<'_, str> {
    let max_width = usize::from(max_width);
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    let mut width = 0;
    let mut truncated: String = s
        .chars()
        .take_while(|ch| {
            let w = UnicodeWidthChar::width(*ch).unwrap_or(0);
            if width + w > max_width - 1 {
                return false;
            }
            width += w;
            true
        })
        .collect();
    truncated.push('…');
    Cow::Owned(truncated)
}

/// Row highlight from the configured colours. Unparseable colour names are
/// ignored; with no colours at all the row is shown reversed.
pub(crate) fn selection_style(config: &SelectionStyle) -> Style {
    let parse = |name: &Option<String>| name.as_deref().and_then(|n| n.parse::<Color>().ok());
    let bg = parse(&config.background);
    let fg = parse(&config.foreground);

    let mut style = Style::default();
    if bg.is_none() && fg.is_none() {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if let Some(bg) = bg {
        style = style.bg(bg);
    }
    if let Some(fg) = fg {
        style = style.fg(fg);
    }
    if config.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

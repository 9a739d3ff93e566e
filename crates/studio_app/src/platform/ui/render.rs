use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap};
use ratatui::Frame;
use studio_core::{AppViewModel, JobPhase, ResultCardView, Severity, ThumbnailStatus};

use super::constants::*;
use super::input::{Focus, UiState};
use super::layout::{shrink, ScreenLayout};

pub fn render(
    frame: &mut Frame,
    view: &AppViewModel,
    ui: &UiState,
    layout: &ScreenLayout,
    locale: chrono::Locale,
) {
    render_header(frame, layout.header);
    render_prompt(frame, view, ui, layout.prompt);
    render_options(frame, view, ui, layout);
    render_progress(frame, view, layout.progress);
    render_notice(frame, view, layout.notice);
    render_gallery(frame, view, ui, layout);
    frame.render_widget(
        Paragraph::new(KEY_HINTS).style(Style::default().fg(MUTED)),
        layout.status,
    );

    if let (Some(card), Some(overlay)) = (&view.preview, &layout.overlay) {
        render_preview(frame, card, overlay.content, locale);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                APP_TITLE,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(APP_SUBTITLE, Style::default().fg(MUTED)),
        ]),
        Line::default(),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn field_block<'a>(title: &'a str, focused: bool, enabled: bool) -> Block<'a> {
    let border = if !enabled {
        Style::default().fg(MUTED)
    } else if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
}

fn render_prompt(frame: &mut Frame, view: &AppViewModel, ui: &UiState, area: Rect) {
    let focused = ui.focus == Focus::Prompt && view.preview.is_none();
    let block = field_block(PROMPT_TITLE, focused, view.form.enabled);
    let inner = block.inner(area);

    let line = if view.form.prompt.is_empty() {
        Line::styled(PROMPT_PLACEHOLDER, Style::default().fg(MUTED))
    } else {
        let visible = tail_fitting(&view.form.prompt, inner.width.saturating_sub(1));
        Line::styled(visible, Style::default().fg(TEXT))
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if focused && view.form.enabled && inner.width > 0 && inner.height > 0 {
        let typed = Line::from(tail_fitting(&view.form.prompt, inner.width.saturating_sub(1)));
        let offset = u16::try_from(typed.width()).unwrap_or(inner.width);
        frame.set_cursor_position(Position::new(
            inner.x + offset.min(inner.width.saturating_sub(1)),
            inner.y,
        ));
    }
}

/// The longest suffix of `text` that fits in `width` columns.
fn tail_fitting(text: &str, width: u16) -> &str {
    let mut used = 0usize;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = Span::raw(ch.to_string()).width();
        if used + w > usize::from(width) {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

fn render_options(frame: &mut Frame, view: &AppViewModel, ui: &UiState, layout: &ScreenLayout) {
    let enabled = view.form.enabled;
    let selector = |value: String| {
        Line::from(vec![
            Span::styled("\u{25c0} ", Style::default().fg(MUTED)),
            Span::styled(value, Style::default().fg(TEXT)),
            Span::styled(" \u{25b6}", Style::default().fg(MUTED)),
        ])
        .alignment(Alignment::Center)
    };

    let duration = selector(view.form.duration.to_string());
    frame.render_widget(
        Paragraph::new(duration).block(field_block(
            DURATION_TITLE,
            ui.focus == Focus::Duration,
            enabled,
        )),
        layout.duration,
    );

    let aspect = view.form.aspect_ratio;
    let aspect_line = selector(format!("{} ({})", aspect.label(), aspect.orientation()));
    frame.render_widget(
        Paragraph::new(aspect_line).block(field_block(
            ASPECT_TITLE,
            ui.focus == Focus::Aspect,
            enabled,
        )),
        layout.aspect,
    );

    let (label, style) = match view.job.phase {
        JobPhase::Running => (
            format!("Generating... {}%", view.job.progress),
            Style::default().fg(MUTED),
        ),
        JobPhase::Idle if view.form.can_submit => (
            GENERATE_LABEL.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        JobPhase::Idle => (GENERATE_LABEL.to_string(), Style::default().fg(MUTED)),
    };
    let button = Paragraph::new(Line::styled(label, style).alignment(Alignment::Center)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(style),
    );
    frame.render_widget(button, layout.generate);
}

fn render_progress(frame: &mut Frame, view: &AppViewModel, area: Rect) {
    if view.job.phase != JobPhase::Running {
        return;
    }
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(THUMBNAIL_BG))
        .percent(u16::from(view.job.progress.min(100)))
        .label(format!("{}%", view.job.progress));
    frame.render_widget(gauge, area);
}

fn render_notice(frame: &mut Frame, view: &AppViewModel, area: Rect) {
    let Some(notice) = &view.notice else {
        return;
    };
    let color = match notice.severity {
        Severity::Info => INFO,
        Severity::Error => ERROR,
    };
    frame.render_widget(
        Paragraph::new(Line::styled(notice.text.clone(), Style::default().fg(color))),
        area,
    );
}

fn render_gallery(frame: &mut Frame, view: &AppViewModel, ui: &UiState, layout: &ScreenLayout) {
    let title = format!("{} ({})", GALLERY_TITLE, view.cards.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED));
    frame.render_widget(block, layout.gallery);
    let inner = shrink(layout.gallery);

    if view.show_empty_state {
        render_gallery_hint(frame, inner, EMPTY_STATE_TEXT);
        return;
    }
    // Cards exist but none fits the current height.
    if layout.cards.is_empty() && !view.cards.is_empty() {
        render_gallery_hint(frame, inner, TOO_SMALL_TEXT);
        return;
    }

    for card_layout in &layout.cards {
        let Some(card) = view.cards.get(card_layout.index) else {
            continue;
        };
        let highlighted = ui.focus == Focus::Gallery && ui.highlighted == card_layout.index;
        render_card(frame, card, card_layout.area, card_layout.download, highlighted);
    }
}

fn render_gallery_hint(frame: &mut Frame, area: Rect, text: &str) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);
    let lines = vec![
        Line::styled("\u{25b6}", Style::default().fg(MUTED)),
        Line::default(),
        Line::styled(text, Style::default().fg(MUTED)),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        middle,
    );
}

fn thumbnail_caption(status: ThumbnailStatus) -> String {
    match status {
        ThumbnailStatus::Pending => "loading thumbnail...".to_string(),
        ThumbnailStatus::Ready { bytes } => format!("\u{25b6}  {}", format_size(bytes)),
        ThumbnailStatus::Fallback => "\u{25a7} placeholder".to_string(),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

fn render_thumbnail(frame: &mut Frame, card: &ResultCardView, area: Rect) {
    if area.height == 0 {
        return;
    }
    let mut lines = vec![Line::default(); usize::from(area.height.saturating_sub(1) / 2)];
    lines.push(Line::from(thumbnail_caption(card.thumbnail_status)).alignment(Alignment::Center));
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(TEXT).bg(THUMBNAIL_BG)),
        area,
    );
}

fn render_card(
    frame: &mut Frame,
    card: &ResultCardView,
    area: Rect,
    download: Rect,
    highlighted: bool,
) {
    let border = if highlighted {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [thumb, prompt, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(2),
    ])
    .areas(inner);

    render_thumbnail(frame, card, thumb);
    frame.render_widget(
        Paragraph::new(card.prompt.as_str())
            .style(Style::default().fg(TEXT))
            .wrap(Wrap { trim: true }),
        prompt,
    );
    let meta = format!("\u{23f1} {}  {}", card.duration, card.aspect_ratio);
    frame.render_widget(
        Paragraph::new(Line::styled(meta, Style::default().fg(MUTED))),
        Rect::new(footer.x, download.y, footer.width, 1.min(footer.height)),
    );
    frame.render_widget(
        Paragraph::new(Line::styled(DOWNLOAD_LABEL, Style::default().fg(ACCENT))),
        download,
    );
}

fn render_preview(frame: &mut Frame, card: &ResultCardView, area: Rect, locale: chrono::Locale) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!("Result #{}", card.id))
        .title(Line::from(CLOSE_LABEL).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [thumb, details, download] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    render_thumbnail(frame, card, thumb);

    let details_lines = vec![
        Line::default(),
        Line::styled(
            card.prompt.clone(),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::styled(
            format!(
                "\u{23f1} {} seconds   {}   {}",
                card.duration.seconds(),
                card.aspect_ratio,
                format_created(card.created_at, locale)
            ),
            Style::default().fg(MUTED),
        ),
        Line::styled(card.thumbnail.to_string(), Style::default().fg(MUTED)),
    ];
    frame.render_widget(
        Paragraph::new(details_lines).wrap(Wrap { trim: true }),
        details,
    );
    frame.render_widget(
        Paragraph::new(Line::styled(
            PREVIEW_DOWNLOAD_LABEL,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        download,
    );
}

/// Creation date in the user's timezone, formatted for `locale`.
pub fn format_created(created_at: DateTime<Utc>, locale: chrono::Locale) -> String {
    format_date(&created_at.with_timezone(&Local), locale)
}

fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, locale: chrono::Locale) -> String
where
    Tz::Offset: fmt::Display,
{
    date.format_localized("%x", locale).to_string()
}

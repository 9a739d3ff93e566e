use ratatui::layout::{Constraint, Layout, Position, Rect};
use studio_core::{AppViewModel, ResultId};

use super::constants::*;

/// Screen regions for one frame. Rendering and mouse hit-testing share it so
/// a click always lands on what was drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub prompt: Rect,
    pub duration: Rect,
    pub aspect: Rect,
    pub generate: Rect,
    pub progress: Rect,
    pub notice: Rect,
    pub gallery: Rect,
    pub status: Rect,
    pub columns: u16,
    pub cards: Vec<CardLayout>,
    pub overlay: Option<OverlayLayout>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub id: ResultId,
    pub index: usize,
    pub area: Rect,
    pub download: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    pub content: Rect,
    pub close: Rect,
    pub download: Rect,
}

/// What sits under a mouse position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Prompt,
    Duration,
    Aspect,
    Generate,
    Card { id: ResultId, index: usize },
    CardDownload { id: ResultId },
    OverlayClose,
    OverlayDownload,
    OverlayContent,
    Backdrop,
    Nothing,
}

/// Gallery columns for a given inner width: one on narrow terminals, up to
/// three on wide ones.
pub fn columns_for_width(width: u16) -> u16 {
    match width {
        w if w >= 120 => 3,
        w if w >= 80 => 2,
        _ => 1,
    }
}

pub fn compute(area: Rect, view: &AppViewModel, highlighted: usize) -> ScreenLayout {
    let [header, prompt, options, progress, notice, gallery, status] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(area);

    let [duration, aspect, generate] = Layout::horizontal([
        Constraint::Length(20),
        Constraint::Length(26),
        Constraint::Min(18),
    ])
    .areas(options);

    let gallery_inner = shrink(gallery);
    let columns = columns_for_width(gallery_inner.width);
    let cards = layout_cards(gallery_inner, columns, view, highlighted);
    let overlay = view.preview.as_ref().map(|_| layout_overlay(area));

    ScreenLayout {
        header,
        prompt,
        duration,
        aspect,
        generate,
        progress,
        notice,
        gallery,
        status,
        columns,
        cards,
        overlay,
    }
}

impl ScreenLayout {
    pub fn hit(&self, column: u16, row: u16) -> Hit {
        let pos = Position::new(column, row);

        if let Some(overlay) = &self.overlay {
            return if overlay.close.contains(pos) {
                Hit::OverlayClose
            } else if overlay.download.contains(pos) {
                Hit::OverlayDownload
            } else if overlay.content.contains(pos) {
                Hit::OverlayContent
            } else {
                Hit::Backdrop
            };
        }

        for card in &self.cards {
            if card.download.contains(pos) {
                return Hit::CardDownload { id: card.id };
            }
            if card.area.contains(pos) {
                return Hit::Card {
                    id: card.id,
                    index: card.index,
                };
            }
        }

        if self.prompt.contains(pos) {
            Hit::Prompt
        } else if self.duration.contains(pos) {
            Hit::Duration
        } else if self.aspect.contains(pos) {
            Hit::Aspect
        } else if self.generate.contains(pos) {
            Hit::Generate
        } else {
            Hit::Nothing
        }
    }
}

fn layout_cards(
    area: Rect,
    columns: u16,
    view: &AppViewModel,
    highlighted: usize,
) -> Vec<CardLayout> {
    if view.cards.is_empty() || area.width == 0 || area.height < CARD_HEIGHT {
        return Vec::new();
    }

    let columns_usize = usize::from(columns);
    let visible_rows = usize::from(area.height / CARD_HEIGHT).max(1);
    let highlighted_row = highlighted.min(view.cards.len() - 1) / columns_usize;
    let first_row = (highlighted_row + 1).saturating_sub(visible_rows);
    let card_width = area.width / columns;

    view.cards
        .iter()
        .enumerate()
        .skip(first_row * columns_usize)
        .take(visible_rows * columns_usize)
        .map(|(index, card)| {
            let offset = index - first_row * columns_usize;
            let col = (offset % columns_usize) as u16;
            let row = (offset / columns_usize) as u16;
            let card_area = Rect::new(
                area.x + col * card_width,
                area.y + row * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT,
            );
            CardLayout {
                id: card.id,
                index,
                area: card_area,
                download: bottom_right(shrink(card_area), label_width(DOWNLOAD_LABEL)),
            }
        })
        .collect()
}

fn layout_overlay(area: Rect) -> OverlayLayout {
    let width = OVERLAY_MAX_WIDTH.min(area.width.saturating_sub(4));
    let height = OVERLAY_MAX_HEIGHT.min(area.height.saturating_sub(2));
    let content = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let close_width = label_width(CLOSE_LABEL).min(content.width);
    let close = Rect::new(
        (content.x + content.width).saturating_sub(close_width + 1),
        content.y,
        close_width,
        1.min(content.height),
    );
    let inner = shrink(content);
    let download_width = label_width(PREVIEW_DOWNLOAD_LABEL).min(inner.width);
    let download = Rect::new(
        inner.x,
        (inner.y + inner.height).saturating_sub(1),
        download_width,
        1.min(inner.height),
    );

    OverlayLayout {
        content,
        close,
        download,
    }
}

/// The area inside a one-cell border.
pub fn shrink(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

fn bottom_right(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(
        area.x + area.width - width,
        (area.y + area.height).saturating_sub(1),
        width,
        1.min(area.height),
    )
}

fn label_width(label: &str) -> u16 {
    u16::try_from(label.chars().count()).unwrap_or(u16::MAX)
}

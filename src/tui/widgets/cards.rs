//! Bordered stat cards laid out in a centered grid

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

/// Card dimensions
pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 5;

/// Horizontal gap between cards
const CARD_SPACING: u16 = 2;

/// One titled value
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub color: Color,
}

impl StatCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            color,
        }
    }
}

/// Cards per row that fit `width`, capped at `max_cols`
pub fn cards_per_row(width: u16, max_cols: usize) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + CARD_SPACING)) as usize;
    cards.clamp(1, max_cols.max(1))
}

/// Height of a grid holding `count` cards in `cols` columns
pub fn grid_height(count: usize, cols: usize) -> u16 {
    let rows = count.div_ceil(cols.max(1));
    (rows as u16) * (CARD_HEIGHT + 1) // +1 for spacing
}

/// Grid of stat cards
pub struct CardGrid<'a> {
    cards: &'a [StatCard],
    cols: usize,
}

impl<'a> CardGrid<'a> {
    pub fn new(cards: &'a [StatCard], cols: usize) -> Self {
        Self {
            cards,
            cols: cols.max(1),
        }
    }
}

impl Widget for CardGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(self.cards.len().max(1));
        let total_cards_width =
            (cols as u16) * CARD_WIDTH + (cols.saturating_sub(1) as u16) * CARD_SPACING;
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in self.cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_x = start_x + (col as u16) * (CARD_WIDTH + CARD_SPACING);
            let card_y = area.y + (row as u16) * (CARD_HEIGHT + 1);

            // Skip if card is outside area
            if card_y + CARD_HEIGHT > area.y + area.height
                || card_x + CARD_WIDTH > area.x + area.width
            {
                continue;
            }

            render_card(
                Rect {
                    x: card_x,
                    y: card_y,
                    width: CARD_WIDTH,
                    height: CARD_HEIGHT,
                },
                buf,
                card,
            );
        }
    }
}

fn render_card(area: Rect, buf: &mut Buffer, card: &StatCard) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(card.color))
        .render(area, buf);

    let inner_width = area.width.saturating_sub(2);

    // Title on line 1 inside the border
    let title_len = card.title.chars().count() as u16;
    let title_x = area.x + 1 + inner_width.saturating_sub(title_len) / 2;
    buf.set_stringn(
        title_x,
        area.y + 1,
        &card.title,
        inner_width as usize,
        Style::default().fg(card.color),
    );

    // Value on line 3
    let value_len = card.value.chars().count() as u16;
    let value_x = area.x + 1 + inner_width.saturating_sub(value_len) / 2;
    buf.set_stringn(
        value_x,
        area.y + 3,
        &card.value,
        inner_width as usize,
        Style::default()
            .fg(card.color)
            .add_modifier(Modifier::BOLD),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_per_row_narrow() {
        assert_eq!(cards_per_row(40, 4), 1);
    }

    #[test]
    fn test_cards_per_row_wide() {
        // (120 - 4) / 26 = 4
        assert_eq!(cards_per_row(120, 4), 4);
        assert_eq!(cards_per_row(120, 3), 3);
    }

    #[test]
    fn test_cards_per_row_minimum() {
        assert_eq!(cards_per_row(10, 3), 1);
    }

    #[test]
    fn test_grid_height() {
        assert_eq!(grid_height(6, 3), 2 * (CARD_HEIGHT + 1));
        assert_eq!(grid_height(4, 3), 2 * (CARD_HEIGHT + 1));
        assert_eq!(grid_height(3, 3), CARD_HEIGHT + 1);
    }

    #[test]
    fn test_card_grid_renders_values() {
        let cards = vec![
            StatCard::new("Total Bookings", "42", Color::Cyan),
            StatCard::new("Revenue", "₹6,000", Color::Magenta),
        ];
        let area = Rect::new(0, 0, 80, CARD_HEIGHT);
        let mut buf = Buffer::empty(area);
        CardGrid::new(&cards, 2).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Total Bookings"));
        assert!(content.contains("42"));
        assert!(content.contains("Revenue"));
    }
}

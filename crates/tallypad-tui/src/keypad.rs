//! The on-screen keypad: a clickable button grid mirroring the physical
//! layout, with span-aware hit testing for mouse input.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};
use tallypad::prelude::{Digit, Key, Op};

/// A single keypad button.
///
/// `span` is the number of grid columns the button occupies; the clear and
/// zero buttons are double width, and equals appears in the last column of
/// the two bottom rows to stand in for a two-row button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    /// Text drawn on the button face.
    pub label: &'static str,
    /// Key press the button produces.
    pub key: Key,
    /// Grid columns occupied.
    pub span: u16,
}

impl Button {
    /// Creates a button.
    #[must_use]
    pub const fn new(label: &'static str, key: Key, span: u16) -> Self {
        Self { label, key, span }
    }
}

/// The keypad layout:
/// ```text
/// [   AC   ][ ÷ ][ × ]
/// [ 7 ][ 8 ][ 9 ][ - ]
/// [ 4 ][ 5 ][ 6 ][ + ]
/// [ 1 ][ 2 ][ 3 ][ = ]
/// [   0    ][ . ][ = ]
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<Vec<Button>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Grid columns. Each row's spans sum to this.
    pub const COLS: u16 = 4;

    /// Grid rows.
    pub const ROWS: u16 = 5;

    /// Creates the standard keypad layout.
    #[must_use]
    pub fn new() -> Self {
        let rows = vec![
            vec![
                Button::new("AC", Key::Clear, 2),
                Button::new("÷", Key::Op(Op::Divide), 1),
                Button::new("×", Key::Op(Op::Multiply), 1),
            ],
            vec![
                Button::new("7", Key::Digit(Digit::ALL[7]), 1),
                Button::new("8", Key::Digit(Digit::ALL[8]), 1),
                Button::new("9", Key::Digit(Digit::ALL[9]), 1),
                Button::new("-", Key::Op(Op::Subtract), 1),
            ],
            vec![
                Button::new("4", Key::Digit(Digit::ALL[4]), 1),
                Button::new("5", Key::Digit(Digit::ALL[5]), 1),
                Button::new("6", Key::Digit(Digit::ALL[6]), 1),
                Button::new("+", Key::Op(Op::Add), 1),
            ],
            vec![
                Button::new("1", Key::Digit(Digit::ALL[1]), 1),
                Button::new("2", Key::Digit(Digit::ALL[2]), 1),
                Button::new("3", Key::Digit(Digit::ALL[3]), 1),
                Button::new("=", Key::Equals, 1),
            ],
            vec![
                Button::new("0", Key::Digit(Digit::ALL[0]), 2),
                Button::new(".", Key::Decimal, 1),
                Button::new("=", Key::Equals, 1),
            ],
        ];
        Self { rows }
    }

    /// Returns the button rows in layout order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    /// Returns the total number of buttons.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Maps a terminal click position inside `area` to the key it lands on.
    ///
    /// The border row and column are dead space. Positions past the grid
    /// (width or height not evenly divisible) hit nothing.
    #[must_use]
    pub fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<Key> {
        if x <= area.x
            || y <= area.y
            || x + 1 >= area.x + area.width
            || y + 1 >= area.y + area.height
        {
            return None;
        }

        let inner_x = x - area.x - 1;
        let inner_y = y - area.y - 1;

        let cell_w = (area.width - 2) / Self::COLS;
        let cell_h = (area.height - 2) / Self::ROWS;
        if cell_w == 0 || cell_h == 0 {
            return None;
        }

        let row = (inner_y / cell_h) as usize;
        let col = inner_x / cell_w;

        let mut start = 0;
        for button in self.rows.get(row)? {
            if col < start + button.span {
                return Some(button.key);
            }
            start += button.span;
        }
        None
    }
}

/// Keypad widget for rendering.
#[derive(Debug)]
pub struct GridWidget<'a> {
    grid: &'a Grid,
    highlight: Option<Key>,
}

impl<'a> GridWidget<'a> {
    /// Creates a widget over the grid, highlighting the most recent key.
    #[must_use]
    pub const fn new(grid: &'a Grid, highlight: Option<Key>) -> Self {
        Self { grid, highlight }
    }

    fn button_style(&self, button: &Button) -> Style {
        if self.highlight == Some(button.key) {
            return Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
        }
        match button.key {
            Key::Digit(_) | Key::Decimal => Style::default().fg(Color::White),
            Key::Op(_) => Style::default().fg(Color::Yellow),
            Key::Equals => Style::default().fg(Color::Green),
            Key::Clear => Style::default().fg(Color::Red),
        }
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(" Keypad ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .render(area, buf);

        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };

        if inner.width < Grid::COLS || inner.height < Grid::ROWS {
            return;
        }

        let cell_w = inner.width / Grid::COLS;
        let cell_h = inner.height / Grid::ROWS;

        for (row_idx, row) in self.grid.rows().iter().enumerate() {
            let y = inner.y + row_idx as u16 * cell_h;
            let label_y = y + cell_h / 2;
            let mut col = 0u16;
            for button in row {
                let width = button.span * cell_w;
                let x = inner.x + col * cell_w;
                let style = self.button_style(button);

                let label = format!("[{}]", button.label);
                let label_width = label.chars().count() as u16;
                let label_x = x + width.saturating_sub(label_width) / 2;
                if label_y < inner.y + inner.height && label_x < inner.x + inner.width {
                    buf.set_span(label_x, label_y, &Span::styled(label, style), width);
                }
                col += button.span;
            }
        }
    }
}

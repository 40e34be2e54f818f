//! Character-cell framebuffer the game view paints into.
//!
//! Coordinates are terminal columns and rows. Every write is clipped to the
//! buffer, so callers can paint sprites that hang over the edge of a small
//! terminal without checking bounds themselves.

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Stroke weight of a glyph. Terminals render at most one of these per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weight {
    #[default]
    Normal,
    Bold,
    Dim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub weight: Weight,
}

impl CellStyle {
    /// Light grey on black, the style of an untouched cell.
    pub const PLAIN: Self = Self::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0));

    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            weight: Weight::Normal,
        }
    }

    pub const fn bold(self) -> Self {
        Self {
            weight: Weight::Bold,
            ..self
        }
    }

    pub const fn dim(self) -> Self {
        Self {
            weight: Weight::Dim,
            ..self
        }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::PLAIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Cell {
    pub const BLANK: Self = Self::new(' ', CellStyle::PLAIN);

    pub const fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Block of cells: top-left `(x, y)`, `w` columns by `h` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl CellRect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Shift by `(dx, dy)`, saturating at the grid edge.
    pub fn offset(self, dx: u16, dy: u16) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Change dimensions in place; the cell vector is reused.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.cells
                .resize(width as usize * height as usize, Cell::BLANK);
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y`, left to right.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.row(y).and_then(|row| row.get(x as usize)).copied()
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Paint every cell of `area` that lies inside the buffer.
    pub fn fill(&mut self, area: CellRect, cell: Cell) {
        let x0 = area.x.min(self.width) as usize;
        let x1 = area.x.saturating_add(area.w).min(self.width) as usize;
        let y1 = area.y.saturating_add(area.h).min(self.height);
        let stride = self.width as usize;
        for y in area.y.min(self.height)..y1 {
            let start = y as usize * stride;
            self.cells[start + x0..start + x1].fill(cell);
        }
    }

    /// Write `text` on row `y` from column `x`. Returns the column after it.
    pub fn text(&mut self, x: u16, y: u16, text: &str, style: CellStyle) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            self.set(col, y, Cell::new(ch, style));
            col += 1;
        }
        col
    }

    /// Decimal `value` at `(x, y)`, without going through a `String`.
    pub fn number(&mut self, x: u16, y: u16, value: u32, style: CellStyle) -> u16 {
        let mut digits = [b'0'; 10];
        let mut first = digits.len();
        let mut rest = value;
        loop {
            first -= 1;
            digits[first] = b'0' + (rest % 10) as u8;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }

        let mut col = x;
        for &d in &digits[first..] {
            self.set(col, y, Cell::new(d as char, style));
            col = col.saturating_add(1);
        }
        col
    }

    /// Row `y` as plain text.
    pub fn row_string(&self, y: u16) -> String {
        self.row(y)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }
}

// src/layout.rs

//! Block layout and pagination.
//!
//! The generator emits a flat list of [`Block`]s; this module flows them down
//! A4 pages, breaking paragraphs at line granularity and keeping table rows
//! and images whole. Coordinates here are y-down from the top of the page,
//! in points; the PDF writer flips them at the end.

use crate::canvas::ArtifactImage;
use crate::codeblock::StyledBlock;
use crate::color::Color;
use crate::table::TableLayout;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 72.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

// Band reserved for flowing content, between the page header and footer.
pub const CONTENT_TOP: f32 = 110.0;
pub const CONTENT_BOTTOM: f32 = 762.0;

const CODE_INSET: f32 = 20.0;
const CODE_PAD: f32 = 10.0;
const CODE_SIZE: f32 = 9.0;
const CODE_LEADING: f32 = 11.0;

const CELL_HPAD: f32 = 6.0;
const HEADER_VPAD: f32 = 12.0;
const BODY_VPAD: f32 = 8.0;
const HEADER_FONT_SIZE: f32 = 12.0;
const BODY_FONT_SIZE: f32 = 10.0;
const HEADER_LEADING: f32 = 14.0;
const BODY_LEADING: f32 = 12.0;

const PLACEHOLDER_HEIGHT: f32 = 30.0;

/// The five base fonts every PDF reader ships with. No font files are
/// embedded; resource names map to these in the font dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    Courier,
    CourierBold,
}

impl Font {
    pub const ALL: [Font; 5] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::TimesRoman,
        Font::Courier,
        Font::CourierBold,
    ];

    pub fn resource(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::TimesRoman => "F3",
            Font::Courier => "F4",
            Font::CourierBold => "F5",
        }
    }

    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::TimesRoman => "Times-Roman",
            Font::Courier => "Courier",
            Font::CourierBold => "Courier-Bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub leading: f32,
    pub color: Color,
    pub align: Align,
}

/// Colors a table pulls from the document palette.
#[derive(Debug, Clone, Copy)]
pub struct TableTheme {
    pub header_bg: Color,
    pub header_text: Color,
    pub body_text: Color,
    pub zebra: [Color; 2],
    pub grid: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct CodeTheme {
    pub background: Color,
    pub border: Color,
    pub text: Color,
}

/// One flowable unit of the document body.
#[derive(Debug, Clone)]
pub enum Block {
    Heading { text: String, style: TextStyle },
    Paragraph { text: String, style: TextStyle },
    Rule { color: Color, thickness: f32 },
    Spacer { height: f32 },
    PageBreak,
    Table { layout: TableLayout, theme: TableTheme },
    InfoTable { rows: Vec<(String, String)>, color: Color, grid: Color },
    Image { image: ArtifactImage, width: f32, height: f32 },
    Code { block: StyledBlock, theme: CodeTheme },
    Placeholder { text: String, color: Color, border: Color },
}

/// A primitive placed on a page. `y` is the top edge of the item's box,
/// measured down from the page top.
#[derive(Debug, Clone)]
pub struct Positioned {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub item: Item,
}

#[derive(Debug, Clone)]
pub enum Item {
    Text {
        content: String,
        font: Font,
        size: f32,
        color: Color,
    },
    RectFill {
        color: Color,
    },
    RectStroke {
        color: Color,
        thickness: f32,
    },
    Image {
        image: ArtifactImage,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Positioned>,
}

/// Approximate advance width of a string in the base fonts.
pub fn measure_text(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}

/// Greedy word wrap. A single word wider than the limit is committed on its
/// own line rather than split.
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure_text(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Hard wrap for preformatted text, splitting at the character limit.
fn wrap_hard(line: &str, max_chars: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

struct Paginator {
    pages: Vec<Page>,
    current: Page,
    y: f32,
}

impl Paginator {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            y: CONTENT_TOP,
        }
    }

    fn remaining(&self) -> f32 {
        CONTENT_BOTTOM - self.y
    }

    fn flush(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = CONTENT_TOP;
    }

    /// Start a new page unless the block fits or the page is still empty.
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() && !self.current.items.is_empty() {
            self.flush();
        }
    }

    fn place(&mut self, x: f32, width: f32, height: f32, item: Item) {
        self.current.items.push(Positioned {
            x,
            y: self.y,
            width,
            height,
            item,
        });
    }

    fn line_x(&self, width: f32, align: Align) -> f32 {
        match align {
            Align::Left => MARGIN,
            Align::Center => MARGIN + (CONTENT_WIDTH - width) / 2.0,
            Align::Right => MARGIN + CONTENT_WIDTH - width,
        }
    }

    fn text_lines(&mut self, lines: &[String], style: &TextStyle, atomic: bool) {
        if atomic {
            self.ensure(lines.len() as f32 * style.leading);
        }
        for line in lines {
            if !atomic && style.leading > self.remaining() && !self.current.items.is_empty() {
                self.flush();
            }
            let width = measure_text(line, style.size);
            let x = self.line_x(width, style.align);
            self.place(
                x,
                width,
                style.size,
                Item::Text {
                    content: line.clone(),
                    font: style.font,
                    size: style.size,
                    color: style.color,
                },
            );
            self.y += style.leading;
        }
    }

    fn table(&mut self, layout: TableLayout, theme: TableTheme) {
        let total: f32 = layout.col_widths.iter().sum();
        let scale = if total > CONTENT_WIDTH {
            CONTENT_WIDTH / total
        } else {
            1.0
        };
        let widths: Vec<f32> = layout.col_widths.iter().map(|w| w * scale).collect();
        let table_w: f32 = widths.iter().sum();
        let x0 = MARGIN + (CONTENT_WIDTH - table_w) / 2.0;

        for (r, row) in layout.rows.iter().enumerate() {
            let header = r == 0;
            let (size, leading, vpad) = if header {
                (HEADER_FONT_SIZE, HEADER_LEADING, HEADER_VPAD)
            } else {
                (BODY_FONT_SIZE, BODY_LEADING, BODY_VPAD)
            };
            let font = if header {
                Font::HelveticaBold
            } else {
                Font::Helvetica
            };

            let wrapped: Vec<Vec<String>> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| {
                    let lines = wrap_text(cell, size, w - 2.0 * CELL_HPAD);
                    if lines.is_empty() {
                        vec![String::new()]
                    } else {
                        lines
                    }
                })
                .collect();
            // rows never break across pages; a row that alone wraps taller
            // than the band is capped there and its overflow lines dropped
            let band_lines =
                ((CONTENT_BOTTOM - CONTENT_TOP - 2.0 * vpad) / leading).floor() as usize;
            let line_count = wrapped
                .iter()
                .map(Vec::len)
                .max()
                .unwrap_or(1)
                .min(band_lines.max(1));
            let row_h = line_count as f32 * leading + 2.0 * vpad;

            if row_h > self.remaining() && !self.current.items.is_empty() {
                self.flush();
            }

            let fill = if header {
                theme.header_bg
            } else {
                theme.zebra[(r - 1) % 2]
            };
            self.place(x0, table_w, row_h, Item::RectFill { color: fill });

            let mut cx = x0;
            for (cell_lines, w) in wrapped.iter().zip(&widths) {
                self.current.items.push(Positioned {
                    x: cx,
                    y: self.y,
                    width: *w,
                    height: row_h,
                    item: Item::RectStroke {
                        color: theme.grid,
                        thickness: 1.0,
                    },
                });
                let color = if header {
                    theme.header_text
                } else {
                    theme.body_text
                };
                for (li, line) in cell_lines.iter().take(line_count).enumerate() {
                    let lw = measure_text(line, size);
                    self.current.items.push(Positioned {
                        x: cx + (w - lw) / 2.0,
                        y: self.y + vpad + li as f32 * leading,
                        width: lw,
                        height: size,
                        item: Item::Text {
                            content: line.clone(),
                            font,
                            size,
                            color,
                        },
                    });
                }
                cx += w;
            }
            self.y += row_h;
        }
    }

    /// Two-column key/value grid used on the title page: no header row, no
    /// zebra, left-aligned 11pt text. Kept whole on one page.
    fn info_table(&mut self, rows: Vec<(String, String)>, color: Color, grid: Color) {
        const LABEL_W: f32 = 144.0;
        const VALUE_W: f32 = 288.0;
        const LEADING: f32 = 13.0;
        const VPAD: f32 = 6.0;
        let x0 = MARGIN + (CONTENT_WIDTH - LABEL_W - VALUE_W) / 2.0;

        let wrapped: Vec<(String, Vec<String>)> = rows
            .into_iter()
            .map(|(label, value)| {
                let mut lines = wrap_text(&value, 11.0, VALUE_W - 2.0 * CELL_HPAD);
                if lines.is_empty() {
                    lines.push(String::new());
                }
                (label, lines)
            })
            .collect();
        let total: f32 = wrapped
            .iter()
            .map(|(_, lines)| lines.len() as f32 * LEADING + 2.0 * VPAD)
            .sum();
        self.ensure(total);

        for (label, lines) in wrapped {
            let row_h = lines.len() as f32 * LEADING + 2.0 * VPAD;
            for (cx, w) in [(x0, LABEL_W), (x0 + LABEL_W, VALUE_W)] {
                self.current.items.push(Positioned {
                    x: cx,
                    y: self.y,
                    width: w,
                    height: row_h,
                    item: Item::RectStroke {
                        color: grid,
                        thickness: 0.5,
                    },
                });
            }
            self.current.items.push(Positioned {
                x: x0 + CELL_HPAD,
                y: self.y + VPAD,
                width: measure_text(&label, 11.0),
                height: 11.0,
                item: Item::Text {
                    content: label,
                    font: Font::Helvetica,
                    size: 11.0,
                    color,
                },
            });
            for (li, line) in lines.into_iter().enumerate() {
                self.current.items.push(Positioned {
                    x: x0 + LABEL_W + CELL_HPAD,
                    y: self.y + VPAD + li as f32 * LEADING,
                    width: measure_text(&line, 11.0),
                    height: 11.0,
                    item: Item::Text {
                        content: line,
                        font: Font::Helvetica,
                        size: 11.0,
                        color,
                    },
                });
            }
            self.y += row_h;
        }
    }

    fn code(&mut self, block: StyledBlock, theme: CodeTheme) {
        let label_style = TextStyle {
            font: Font::HelveticaBold,
            size: 10.0,
            leading: 16.0,
            color: theme.text,
            align: Align::Left,
        };
        self.ensure(label_style.leading + CODE_LEADING + 2.0 * CODE_PAD);
        self.text_lines(&[block.label.clone()], &label_style, true);

        let box_w = CONTENT_WIDTH - 2.0 * CODE_INSET;
        let max_chars = ((box_w - 2.0 * CODE_PAD) / (CODE_SIZE * 0.6)).floor() as usize;
        let lines: Vec<String> = block
            .lines
            .iter()
            .flat_map(|line| wrap_hard(line, max_chars))
            .collect();
        if lines.is_empty() {
            return;
        }

        let mut idx = 0;
        while idx < lines.len() {
            let mut fit = ((self.remaining() - 2.0 * CODE_PAD) / CODE_LEADING).floor() as usize;
            if fit == 0 {
                if self.current.items.is_empty() {
                    fit = 1;
                } else {
                    self.flush();
                    continue;
                }
            }
            let take = fit.min(lines.len() - idx);
            let box_h = take as f32 * CODE_LEADING + 2.0 * CODE_PAD;
            let x = MARGIN + CODE_INSET;

            self.place(x, box_w, box_h, Item::RectFill { color: theme.background });
            self.current.items.push(Positioned {
                x,
                y: self.y,
                width: box_w,
                height: box_h,
                item: Item::RectStroke {
                    color: theme.border,
                    thickness: 1.0,
                },
            });
            for (li, line) in lines[idx..idx + take].iter().enumerate() {
                self.current.items.push(Positioned {
                    x: x + CODE_PAD,
                    y: self.y + CODE_PAD + li as f32 * CODE_LEADING,
                    width: measure_text(line, CODE_SIZE),
                    height: CODE_SIZE,
                    item: Item::Text {
                        content: line.clone(),
                        font: Font::Courier,
                        size: CODE_SIZE,
                        color: theme.text,
                    },
                });
            }
            self.y += box_h;
            idx += take;
            if idx < lines.len() {
                self.flush();
            }
        }
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.items.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Flow blocks into pages.
pub fn paginate(blocks: Vec<Block>) -> Vec<Page> {
    let mut p = Paginator::new();
    for block in blocks {
        match block {
            Block::Heading { text, style } => {
                let lines = wrap_text(&text, style.size, CONTENT_WIDTH);
                p.text_lines(&lines, &style, true);
            }
            Block::Paragraph { text, style } => {
                let lines = wrap_text(&text, style.size, CONTENT_WIDTH);
                p.text_lines(&lines, &style, false);
            }
            Block::Rule { color, thickness } => {
                p.ensure(thickness);
                p.place(MARGIN, CONTENT_WIDTH, thickness, Item::RectFill { color });
                p.y += thickness;
            }
            Block::Spacer { height } => {
                p.y = (p.y + height).min(CONTENT_BOTTOM);
            }
            Block::PageBreak => {
                if !p.current.items.is_empty() {
                    p.flush();
                }
            }
            Block::Table { layout, theme } => p.table(layout, theme),
            Block::InfoTable { rows, color, grid } => p.info_table(rows, color, grid),
            Block::Image { image, width, height } => {
                p.ensure(height);
                let x = MARGIN + (CONTENT_WIDTH - width).max(0.0) / 2.0;
                p.place(x, width, height, Item::Image { image });
                p.y += height;
            }
            Block::Code { block, theme } => p.code(block, theme),
            Block::Placeholder { text, color, border } => {
                p.ensure(PLACEHOLDER_HEIGHT);
                p.place(
                    MARGIN,
                    CONTENT_WIDTH,
                    PLACEHOLDER_HEIGHT,
                    Item::RectStroke {
                        color: border,
                        thickness: 1.0,
                    },
                );
                let width = measure_text(&text, 10.0);
                p.current.items.push(Positioned {
                    x: MARGIN + 10.0,
                    y: p.y + 10.0,
                    width,
                    height: 10.0,
                    item: Item::Text {
                        content: text,
                        font: Font::Helvetica,
                        size: 10.0,
                        color,
                    },
                });
                p.y += PLACEHOLDER_HEIGHT;
            }
        }
    }
    p.finish()
}

// src/compose.rs

//! PDF assembly with `lopdf`.
//!
//! Takes paginated layout output plus the per-document decor (header, footer,
//! page border) and writes a complete document. Only the fourteen standard
//! fonts are referenced, so no font programs are embedded; images land as
//! flate-compressed RGB XObjects.

use crate::canvas::{ArtifactImage, MarkAlign};
use crate::color::Color;
use crate::error::GeneratorError;
use crate::layout::{Font, Item, PAGE_HEIGHT, PAGE_WIDTH, Page, measure_text};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::io::Write;

/// Watermark line printed in the center of every footer.
pub const WATERMARK: &str = "made by DazzloDocs";

/// Fixed page furniture drawn on every page.
#[derive(Debug, Clone)]
pub struct Decor {
    pub college: String,
    pub doc_line: String,
    pub primary: Color,
    pub secondary: Color,
    pub border: Color,
}

/// Assemble the final PDF.
pub fn compose_pdf(pages: Vec<Page>, decor: &Decor) -> Result<Vec<u8>, GeneratorError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let fonts_id = install_fonts(&mut doc);

    let total = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(total);

    for (index, page) in pages.into_iter().enumerate() {
        let mut ops = OpBuffer::default();
        let mut xobjects = Dictionary::new();

        draw_decor(&mut ops, decor, index + 1);

        for item in &page.items {
            match &item.item {
                Item::Text {
                    content,
                    font,
                    size,
                    color,
                } => {
                    let baseline = PAGE_HEIGHT - (item.y + size * 0.8);
                    ops.text(item.x, baseline, *font, *size, *color, content);
                }
                Item::RectFill { color } => {
                    let bottom = PAGE_HEIGHT - (item.y + item.height);
                    ops.rect_fill(item.x, bottom, item.width, item.height, *color);
                }
                Item::RectStroke { color, thickness } => {
                    let bottom = PAGE_HEIGHT - (item.y + item.height);
                    ops.rect_stroke(item.x, bottom, item.width, item.height, *thickness, *color);
                }
                Item::Image { image } => {
                    let name = format!("Im{}", xobjects.len());
                    let stream = image_xobject(image)?;
                    let id = doc.add_object(stream);
                    xobjects.set(name.as_bytes(), Object::Reference(id));

                    let bottom = PAGE_HEIGHT - (item.y + item.height);
                    ops.image(&name, item.x, bottom, item.width, item.height);
                    draw_marks(&mut ops, image, item.x, item.y, item.width);
                }
            }
        }

        let content = Content {
            operations: ops.ops,
        };
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content.encode()?)?;
        let content_id = doc.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            encoder.finish()?,
        ));

        let mut resources = dictionary! { "Font" => Object::Reference(fonts_id) };
        if !xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => total as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn install_fonts(doc: &mut Document) -> lopdf::ObjectId {
    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource().as_bytes(), Object::Reference(id));
    }
    doc.add_object(fonts)
}

fn image_xobject(image: &ArtifactImage) -> Result<Stream, GeneratorError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&image.rgb)?;
    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        encoder.finish()?,
    ))
}

/// Vector text overlays for an image placed at (x, top) with the given width
/// in points. Mark coordinates are canvas pixels, y-down, baseline at y.
fn draw_marks(ops: &mut OpBuffer, image: &ArtifactImage, x: f32, top: f32, width_pt: f32) {
    let scale = width_pt / image.width as f32;
    for mark in &image.marks {
        let font = if mark.bold {
            Font::HelveticaBold
        } else {
            Font::Helvetica
        };
        let w = measure_text(&mark.text, mark.size);
        let px = x + mark.x * scale;
        let py = PAGE_HEIGHT - (top + mark.y * scale);

        if mark.rotated {
            // runs bottom-to-top; align shifts along the vertical baseline
            let y0 = match mark.align {
                MarkAlign::Left => py,
                MarkAlign::Center => py - w / 2.0,
                MarkAlign::Right => py - w,
            };
            ops.text_rotated(px, y0, font, mark.size, mark.color, &mark.text);
        } else {
            let x0 = match mark.align {
                MarkAlign::Left => px,
                MarkAlign::Center => px - w / 2.0,
                MarkAlign::Right => px - w,
            };
            ops.text(x0, py, font, mark.size, mark.color, &mark.text);
        }
    }
}

fn draw_decor(ops: &mut OpBuffer, decor: &Decor, page_no: usize) {
    ops.text(
        MARGIN_X,
        PAGE_HEIGHT - 72.0,
        Font::HelveticaBold,
        16.0,
        decor.primary,
        &decor.college,
    );
    ops.line(MARGIN_X, PAGE_HEIGHT - 85.0, PAGE_WIDTH - MARGIN_X, PAGE_HEIGHT - 85.0, 0.5, decor.primary);
    ops.line(MARGIN_X, PAGE_HEIGHT - 88.0, PAGE_WIDTH - MARGIN_X, PAGE_HEIGHT - 88.0, 0.5, decor.primary);

    ops.rect_stroke(
        36.0,
        36.0,
        PAGE_WIDTH - 72.0,
        PAGE_HEIGHT - 72.0,
        0.5,
        decor.border,
    );

    let footer_y = 50.0;
    ops.text(
        MARGIN_X,
        footer_y,
        Font::TimesRoman,
        8.0,
        decor.secondary,
        &format!("Page {page_no}"),
    );
    let wm_w = measure_text(WATERMARK, 8.0);
    ops.text(
        (PAGE_WIDTH - wm_w) / 2.0,
        footer_y,
        Font::TimesRoman,
        8.0,
        decor.secondary,
        WATERMARK,
    );
    let doc_w = measure_text(&decor.doc_line, 8.0);
    ops.text(
        PAGE_WIDTH - MARGIN_X - doc_w,
        footer_y,
        Font::TimesRoman,
        8.0,
        decor.secondary,
        &decor.doc_line,
    );
}

const MARGIN_X: f32 = 72.0;

/// Encode text for the WinAnsi-encoded base fonts. Latin-1 passes through,
/// the punctuation cp1252 adds on top of it maps to its high bytes, and
/// anything outside becomes a question mark.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

// cp1252 fills 0x80-0x9F, which Latin-1 leaves undefined, with the euro
// sign, curly quotes, dashes and a handful of letters.
fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ if (c as u32) <= 0xFF => c as u8,
        _ => b'?',
    }
}

/// Operation accumulator that drops redundant color changes.
#[derive(Default)]
struct OpBuffer {
    ops: Vec<Operation>,
    fill: Option<Color>,
    stroke: Option<Color>,
}

impl OpBuffer {
    fn set_fill(&mut self, color: Color) {
        if self.fill != Some(color) {
            self.ops.push(Operation::new(
                "rg",
                vec![color.red_f().into(), color.green_f().into(), color.blue_f().into()],
            ));
            self.fill = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color) {
        if self.stroke != Some(color) {
            self.ops.push(Operation::new(
                "RG",
                vec![color.red_f().into(), color.green_f().into(), color.blue_f().into()],
            ));
            self.stroke = Some(color);
        }
    }

    fn rect_fill(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.set_fill(color);
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), w.into(), h.into()],
        ));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn rect_stroke(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: Color) {
        self.set_stroke(color);
        self.ops.push(Operation::new("w", vec![thickness.into()]));
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), w.into(), h.into()],
        ));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, color: Color) {
        self.set_stroke(color);
        self.ops.push(Operation::new("w", vec![thickness.into()]));
        self.ops.push(Operation::new("m", vec![x0.into(), y0.into()]));
        self.ops.push(Operation::new("l", vec![x1.into(), y1.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, x: f32, baseline: f32, font: Font, size: f32, color: Color, content: &str) {
        self.set_fill(color);
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource().into(), size.into()],
        ));
        self.ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(content))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Text rotated 90 degrees counter-clockwise, running bottom to top.
    fn text_rotated(&mut self, x: f32, y: f32, font: Font, size: f32, color: Color, content: &str) {
        self.set_fill(color);
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource().into(), size.into()],
        ));
        self.ops.push(Operation::new(
            "Tm",
            vec![0.into(), 1.into(), (-1).into(), 0.into(), x.into(), y.into()],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(content))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn image(&mut self, name: &str, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
        ));
        self.ops.push(Operation::new("Do", vec![name.into()]));
        self.ops.push(Operation::new("Q", vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Positioned;

    fn decor() -> Decor {
        Decor {
            college: "TEST COLLEGE".into(),
            doc_line: "Subject | Student".into(),
            primary: Color::rgb(0x2C, 0x3E, 0x50),
            secondary: Color::rgb(0x34, 0x49, 0x5E),
            border: Color::rgb(0xBD, 0xC3, 0xC7),
        }
    }

    fn text_page(content: &str) -> Page {
        Page {
            items: vec![Positioned {
                x: 72.0,
                y: 120.0,
                width: 100.0,
                height: 11.0,
                item: Item::Text {
                    content: content.into(),
                    font: Font::Helvetica,
                    size: 11.0,
                    color: Color::BLACK,
                },
            }],
        }
    }

    #[test]
    fn output_is_a_loadable_pdf() {
        let bytes = compose_pdf(vec![text_page("hello")], &decor()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_text_survives_extraction() {
        let bytes = compose_pdf(vec![text_page("salamander")], &decor()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("salamander"));
        assert!(text.contains("TEST COLLEGE"));
        assert!(text.contains(WATERMARK));
        assert!(text.contains("Page 1"));
    }

    #[test]
    fn every_page_gets_numbered_decor() {
        let bytes =
            compose_pdf(vec![text_page("one"), text_page("two")], &decor()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert!(doc.extract_text(&[2]).unwrap().contains("Page 2"));
    }

    #[test]
    fn images_become_xobjects() {
        let image = ArtifactImage {
            width: 4,
            height: 4,
            rgb: vec![200; 48],
            marks: vec![],
        };
        let page = Page {
            items: vec![Positioned {
                x: 72.0,
                y: 150.0,
                width: 450.0,
                height: 270.0,
                item: Item::Image { image },
            }],
        };
        let bytes = compose_pdf(vec![page], &decor()).unwrap();
        assert!(bytes.windows(8).any(|w| w == b"/XObject"));
        assert!(Document::load_mem(&bytes).is_ok());
    }

    #[test]
    fn non_latin_text_degrades_to_placeholders() {
        assert_eq!(encode_text("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_text("\u{4e16}"), vec![b'?']);
    }

    #[test]
    fn cp1252_punctuation_maps_to_the_high_bytes() {
        // curly quotes
        assert_eq!(
            encode_text("\u{2018}\u{2019}\u{201C}\u{201D}"),
            vec![0x91, 0x92, 0x93, 0x94]
        );
        // euro, en dash, em dash, bullet, ellipsis
        assert_eq!(
            encode_text("\u{20AC}5 \u{2013} \u{2014} \u{2022} \u{2026}"),
            vec![0x80, b'5', b' ', 0x96, b' ', 0x97, b' ', 0x95, b' ', 0x85]
        );
        assert_eq!(encode_text("\u{0152}\u{2122}"), vec![0x8C, 0x99]);
    }

    #[test]
    fn smart_punctuation_survives_extraction() {
        let bytes = compose_pdf(
            vec![text_page("caf\u{e9} \u{2014} \u{2018}quoted\u{2019} at \u{20AC}5")],
            &decor(),
        )
        .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("caf\u{e9}"));
        assert!(text.contains('\u{2014}'));
        assert!(text.contains("\u{2018}quoted\u{2019}"));
        assert!(text.contains('\u{20AC}'));
        assert!(!text.contains('?'));
    }
}

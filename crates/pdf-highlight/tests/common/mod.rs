//! Shared fixtures for the pipeline tests

#![allow(dead_code)]

use lopdf::{content::Content, content::Operation, dictionary, Dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Line spacing of generated pages, in points
pub const LEADING: i64 = 16;

/// Font size of generated pages, in points
pub const FONT_SIZE: i64 = 12;

/// Left edge and first baseline of generated text
pub const ORIGIN: (i64, i64) = (72, 720);

/// Helvetica advance widths for WinAnsi codes 32..=126
const HELVETICA_WIDTHS: [i64; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722, 667,
    611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500,
    222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Code the ligature font maps to the `fi` glyph through `/Differences`
pub const FI_CODE: u8 = 12;
const FI_WIDTH: i64 = 500;

/// Fonts the fixtures can set text in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureFont {
    /// Standard Courier, 600 units per glyph
    Courier,
    /// Helvetica with a full `/Widths` array
    Helvetica,
    /// Helvetica whose code 12 is re-encoded as the `fi` ligature
    HelveticaLigatures,
}

impl FixtureFont {
    fn dictionary(self) -> Dictionary {
        match self {
            FixtureFont::Courier => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Courier",
                "FirstChar" => 32,
                "LastChar" => 126,
                "Widths" => vec![Object::Integer(600); 95],
            },
            FixtureFont::Helvetica => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
                "FirstChar" => 32,
                "LastChar" => 126,
                "Widths" => HELVETICA_WIDTHS.iter().map(|w| Object::Integer(*w)).collect::<Vec<_>>(),
            },
            FixtureFont::HelveticaLigatures => {
                let mut widths = vec![Object::Integer(0); 20];
                widths[0] = Object::Integer(FI_WIDTH);
                widths.extend(HELVETICA_WIDTHS.iter().map(|w| Object::Integer(*w)));
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                    "Encoding" => dictionary! {
                        "Type" => "Encoding",
                        "BaseEncoding" => "WinAnsiEncoding",
                        "Differences" => vec![
                            Object::Integer(FI_CODE as i64),
                            Object::Name(b"fi".to_vec()),
                        ],
                    },
                    "FirstChar" => FI_CODE as i64,
                    "LastChar" => 126,
                    "Widths" => widths,
                }
            }
        }
    }

    /// Bytes a producer would write for `text` in this font
    fn encode(self, text: &str) -> Vec<u8> {
        match self {
            FixtureFont::HelveticaLigatures => text.replace("fi", "\u{c}").into_bytes(),
            _ => text.as_bytes().to_vec(),
        }
    }

    /// Advance width of `text` in points at [`FONT_SIZE`]
    pub fn text_width(self, text: &str) -> f64 {
        let units: i64 = self
            .encode(text)
            .into_iter()
            .map(|code| match (self, code) {
                (FixtureFont::Courier, _) => 600,
                (_, FI_CODE) => FI_WIDTH,
                (_, code) => HELVETICA_WIDTHS[(code - 32) as usize],
            })
            .sum();
        units as f64 / 1000.0 * FONT_SIZE as f64
    }
}

/// Build a PDF with one Courier text block per page, one string per line
pub fn create_test_pdf(pages: &[&[&str]]) -> Vec<u8> {
    create_pdf_in(FixtureFont::Courier, pages)
}

/// Build a PDF with one text block per page set in `font`
pub fn create_pdf_in(font: FixtureFont, pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(font.dictionary());

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)],
            ),
            Operation::new(
                "Td",
                vec![Object::Integer(ORIGIN.0), Object::Integer(ORIGIN.1)],
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(0), Object::Integer(-LEADING)],
                ));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(font.encode(line), lopdf::StringFormat::Literal)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    write_pdf_in(dir, name, FixtureFont::Courier, pages)
}

pub fn write_pdf_in(dir: &Path, name: &str, font: FixtureFont, pages: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, create_pdf_in(font, pages)).unwrap();
    path
}

pub fn write_keypoints(dir: &Path, json: &serde_json::Value) -> PathBuf {
    let path = dir.join("keypoints.json");
    std::fs::write(&path, serde_json::to_string_pretty(json).unwrap()).unwrap();
    path
}

//! Highlight annotations on PDF pages

use keypoint_highlighter::{DocumentError, PdfRect, Rgb};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Annotation flag: print with the page
const FLAG_PRINT: i64 = 4;

/// A `/Highlight` annotation read back from a page
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingHighlight {
    /// 0-based page index
    pub page: usize,
    pub rect: PdfRect,
    pub color: Option<Rgb>,
}

fn rgb_array(color: Rgb) -> Object {
    Object::Array(vec![
        Object::Real(color.r),
        Object::Real(color.g),
        Object::Real(color.b),
    ])
}

/// Create a highlight over `rect` and append it to the page's `/Annots`
pub fn add_highlight_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    rect: &PdfRect,
    color: Rgb,
    opacity: f32,
) -> Result<ObjectId, DocumentError> {
    let (x1, y1) = (rect.x as f32, rect.y as f32);
    let (x2, y2) = (rect.right() as f32, rect.top() as f32);

    let appearance_id = doc.add_object(appearance_stream(rect, color, opacity)?);

    let mut annot = Dictionary::new();
    annot.set("Type", Object::Name(b"Annot".to_vec()));
    annot.set("Subtype", Object::Name(b"Highlight".to_vec()));
    annot.set(
        "Rect",
        Object::Array(vec![
            Object::Real(x1),
            Object::Real(y1),
            Object::Real(x2),
            Object::Real(y2),
        ]),
    );
    // Upper-left, upper-right, lower-left, lower-right
    annot.set(
        "QuadPoints",
        Object::Array(vec![
            Object::Real(x1),
            Object::Real(y2),
            Object::Real(x2),
            Object::Real(y2),
            Object::Real(x1),
            Object::Real(y1),
            Object::Real(x2),
            Object::Real(y1),
        ]),
    );
    annot.set("C", rgb_array(color));
    annot.set("CA", Object::Real(opacity));
    annot.set("F", Object::Integer(FLAG_PRINT));
    annot.set("P", Object::Reference(page_id));
    annot.set("AP", dictionary! { "N" => Object::Reference(appearance_id) });

    let annot_id = doc.add_object(Object::Dictionary(annot));
    add_annotation_to_page(doc, page_id, annot_id)?;
    Ok(annot_id)
}

/// Form XObject painting the rectangle with multiply blending
fn appearance_stream(rect: &PdfRect, color: Rgb, opacity: f32) -> Result<Stream, DocumentError> {
    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new("gs", vec![Object::Name(b"GS0".to_vec())]),
        Operation::new(
            "rg",
            vec![
                Object::Real(color.r),
                Object::Real(color.g),
                Object::Real(color.b),
            ],
        ),
        Operation::new(
            "re",
            vec![
                Object::Real(rect.x as f32),
                Object::Real(rect.y as f32),
                Object::Real(rect.width as f32),
                Object::Real(rect.height as f32),
            ],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ];
    let content = Content { operations }
        .encode()
        .map_err(|e| DocumentError::Corrupt(format!("Failed to encode appearance: {}", e)))?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => vec![
            Object::Real(rect.x as f32),
            Object::Real(rect.y as f32),
            Object::Real(rect.right() as f32),
            Object::Real(rect.top() as f32),
        ],
        "Resources" => dictionary! {
            "ExtGState" => dictionary! {
                "GS0" => dictionary! {
                    "Type" => "ExtGState",
                    "BM" => "Multiply",
                    "CA" => Object::Real(opacity),
                    "ca" => Object::Real(opacity),
                },
            },
        },
    };
    Ok(Stream::new(dict, content))
}

fn add_annotation_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), DocumentError> {
    // Annots may be an indirect array shared by reference
    let indirect = match doc.get_object(page_id) {
        Ok(Object::Dictionary(page_dict)) => match page_dict.get(b"Annots") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        },
        Ok(_) => {
            return Err(DocumentError::Corrupt(format!(
                "Page object {:?} is not a dictionary",
                page_id
            )))
        }
        Err(e) => return Err(DocumentError::Corrupt(e.to_string())),
    };

    if let Some(array_id) = indirect {
        if let Ok(Object::Array(arr)) = doc.get_object_mut(array_id) {
            arr.push(Object::Reference(annot_id));
            return Ok(());
        }
    }

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| DocumentError::Corrupt(e.to_string()))?;

    if let Object::Dictionary(ref mut page_dict) = page {
        if let Ok(Object::Array(ref mut arr)) = page_dict.get_mut(b"Annots") {
            arr.push(Object::Reference(annot_id));
        } else {
            page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
        }
    }
    Ok(())
}

/// All `/Highlight` annotations on the given pages, in page order
pub fn read_highlights(doc: &Document, page_ids: &[ObjectId]) -> Vec<ExistingHighlight> {
    let mut found = Vec::new();

    for (page, &page_id) in page_ids.iter().enumerate() {
        let annots = doc
            .get_object(page_id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .and_then(|d| d.get(b"Annots").ok())
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok());
        let Some(annots) = annots else {
            continue;
        };

        for annot in annots {
            let Some(dict) = resolve(doc, annot).and_then(|o| o.as_dict().ok()) else {
                continue;
            };
            if !matches!(dict.get(b"Subtype").and_then(|o| o.as_name()), Ok(b"Highlight")) {
                continue;
            }
            let Some(rect) = dict.get(b"Rect").ok().and_then(|o| rect_of(doc, o)) else {
                continue;
            };
            let color = dict
                .get(b"C")
                .ok()
                .and_then(|o| resolve(doc, o))
                .and_then(|o| o.as_array().ok())
                .and_then(|c| match c.as_slice() {
                    [r, g, b] => Some(Rgb::new(
                        number(r)? as f32,
                        number(g)? as f32,
                        number(b)? as f32,
                    )),
                    _ => None,
                });
            found.push(ExistingHighlight { page, rect, color });
        }
    }

    found
}

fn rect_of(doc: &Document, obj: &Object) -> Option<PdfRect> {
    let arr = resolve(doc, obj)?.as_array().ok()?;
    let v: Vec<f64> = arr.iter().filter_map(number).collect();
    match v.as_slice() {
        [x1, y1, x2, y2] => Some(PdfRect::from_corners(*x1, *y1, *x2, *y2)),
        _ => None,
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Follow a reference, if any
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keypoint_highlighter::palette::{LIGHT_BLUE, YELLOW};

    fn create_test_pdf(indirect_annots: bool) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        if indirect_annots {
            let annots_id = doc.add_object(Object::Array(vec![]));
            if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
                dict.set("Annots", Object::Reference(annots_id));
            }
        }
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        });
        if let Ok(page) = doc.get_object_mut(page_id) {
            if let Ok(dict) = page.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        (doc, page_id)
    }

    #[test]
    fn test_highlight_has_color_quadpoints_and_appearance() {
        let (mut doc, page_id) = create_test_pdf(false);
        let rect = PdfRect::new(50.0, 600.0, 300.0, 20.0);

        let annot_id = add_highlight_annotation(&mut doc, page_id, &rect, LIGHT_BLUE, 0.5).unwrap();

        let annot = doc.get_object(annot_id).unwrap().as_dict().unwrap();
        assert_eq!(annot.get(b"Subtype").unwrap().as_name().unwrap(), b"Highlight");
        assert_eq!(annot.get(b"QuadPoints").unwrap().as_array().unwrap().len(), 8);
        let c = annot.get(b"C").unwrap().as_array().unwrap();
        assert_eq!(c[1].as_float().unwrap(), 0.8);
        assert_eq!(annot.get(b"CA").unwrap().as_float().unwrap(), 0.5);

        let ap = annot.get(b"AP").unwrap().as_dict().unwrap();
        let ap_id = ap.get(b"N").unwrap().as_reference().unwrap();
        let stream = doc.get_object(ap_id).unwrap().as_stream().unwrap();
        let ops = Content::decode(&stream.content).unwrap().operations;
        assert!(ops.iter().any(|op| op.operator == "re"));
    }

    #[test]
    fn test_multiple_highlights_append_to_annots() {
        let (mut doc, page_id) = create_test_pdf(false);
        add_highlight_annotation(&mut doc, page_id, &PdfRect::new(0.0, 0.0, 10.0, 10.0), YELLOW, 1.0)
            .unwrap();
        add_highlight_annotation(&mut doc, page_id, &PdfRect::new(0.0, 20.0, 10.0, 10.0), YELLOW, 1.0)
            .unwrap();

        let highlights = read_highlights(&doc, &[page_id]);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[1].rect, PdfRect::new(0.0, 20.0, 10.0, 10.0));
        assert_eq!(highlights[0].color, Some(YELLOW));
    }

    #[test]
    fn test_indirect_annots_array_is_extended() {
        let (mut doc, page_id) = create_test_pdf(true);
        add_highlight_annotation(&mut doc, page_id, &PdfRect::new(1.0, 2.0, 3.0, 4.0), YELLOW, 1.0)
            .unwrap();

        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert!(page.get(b"Annots").unwrap().as_reference().is_ok());
        assert_eq!(read_highlights(&doc, &[page_id]).len(), 1);
    }

    #[test]
    fn test_non_dictionary_page_is_corrupt() {
        let mut doc = Document::with_version("1.7");
        let bogus = doc.add_object(Object::Integer(7));
        let err = add_highlight_annotation(&mut doc, bogus, &PdfRect::new(0.0, 0.0, 1.0, 1.0), YELLOW, 1.0)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Corrupt(_)));
    }
}

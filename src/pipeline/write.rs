//! PDF serialisation: laid-out pages → PDF bytes via lopdf.
//!
//! The page tree shares one resource dictionary holding the two Helvetica
//! faces. Each page gets a single content stream of `BT … ET` text objects
//! and, when it carries hyperlinks, `/Link` annotations with `/URI`
//! actions.

use crate::error::CfpError;
use crate::pipeline::layout::{LayoutSettings, PageLayout};
use crate::pipeline::metrics::{encode, Face};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use tracing::{debug, warn};

/// Value of the document's `/Producer` entry.
pub const PRODUCER: &str = concat!("cfp2pdf ", env!("CARGO_PKG_VERSION"));

/// Serialise `pages` into a complete PDF file.
pub fn write_pdf(
    pages: &[PageLayout],
    settings: &LayoutSettings,
    title: &str,
) -> Result<Vec<u8>, CfpError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in [Face::Regular, Face::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    let mut replaced_total = 0usize;

    for (index, page) in pages.iter().enumerate() {
        let mut operations = Vec::with_capacity(page.runs.len() * 5);
        for run in &page.runs {
            let (bytes, replaced) = encode(&run.text);
            replaced_total += replaced;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![run.face.resource_name().into(), run.size.into()],
            ));
            operations.push(Operation::new("Td", vec![run.x.into(), run.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(bytes, StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| CfpError::PdfBuild(format!("page {}: {}", index + 1, e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };

        if !page.links.is_empty() {
            let annots: Vec<Object> = page
                .links
                .iter()
                .map(|link| {
                    doc.add_object(dictionary! {
                        "Type" => "Annot",
                        "Subtype" => "Link",
                        "Rect" => link.rect.iter().map(|v| Object::from(*v)).collect::<Vec<_>>(),
                        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                        "A" => dictionary! {
                            "S" => "URI",
                            "URI" => Object::string_literal(link.uri.as_str()),
                        },
                    })
                    .into()
                })
                .collect();
            page_dict.set("Annots", annots);
        }

        kids.push(doc.add_object(page_dict).into());
        debug!(
            "Page {}: {} runs, {} links",
            index + 1,
            page.runs.len(),
            page.links.len()
        );
    }

    if replaced_total > 0 {
        warn!(
            "{} characters have no WinAnsi glyph and were replaced with '?'",
            replaced_total
        );
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::from(settings.page_width),
                Object::from(settings.page_height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let (title_bytes, _) = encode(title);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(title_bytes, StringFormat::Literal),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| CfpError::PdfBuild(e.to_string()))?;
    Ok(buf)
}

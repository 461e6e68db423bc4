//! PDF fixtures for loader and end-to-end tests.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId, Stream, dictionary};

/// Write a one-page PDF whose text layer is `text` in Courier.
///
/// # Errors
///
/// Returns an error if the content stream cannot be encoded or the file cannot be written.
pub fn write_pdf(path: &Path, text: &str) -> lopdf::Result<()> {
    write_pdf_pages(path, &[text])
}

/// Write a PDF with one page per entry of `pages`.
///
/// # Errors
///
/// Returns an error if a content stream cannot be encoded or the file cannot be written.
pub fn write_pdf_pages(path: &Path, pages: &[&str]) -> lopdf::Result<()> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_page_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("two.pdf");
        write_pdf_pages(&file, &["first page", "second page"]).unwrap();

        let doc = lopdf::Document::load(&file).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}

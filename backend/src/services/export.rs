//! PNG and single-page PDF artifacts of a rendered map.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::debug;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use tiny_skia::Pixmap;

pub const PNG_FILENAME: &str = "starlight-map.png";
pub const PDF_FILENAME: &str = "starlight-map.pdf";

/// US Letter in points.
pub const PDF_PAGE_WIDTH: f32 = 612.0;
pub const PDF_PAGE_HEIGHT: f32 = 792.0;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("JPEG encoding failed: {0}")]
    Jpeg(String),
}

/// Encoded file ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Lossless PNG of the surface.
pub fn export_png(pixmap: &Pixmap) -> Result<ExportArtifact, ExportError> {
    let bytes = pixmap
        .encode_png()
        .map_err(|e| ExportError::Png(e.to_string()))?;
    debug!("Encoded PNG export ({} bytes)", bytes.len());
    Ok(ExportArtifact {
        filename: PNG_FILENAME,
        content_type: "image/png",
        bytes,
    })
}

/// One Letter page with the surface as a full-page JPEG.
///
/// The image is stretched to the page, so the aspect ratio follows the
/// page rather than the canvas.
pub fn export_pdf(pixmap: &Pixmap, jpeg_quality: u8) -> Result<ExportArtifact, ExportError> {
    let jpeg = encode_jpeg(pixmap, jpeg_quality)?;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let image_name = Name(b"Im1");

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, PDF_PAGE_WIDTH, PDF_PAGE_HEIGHT));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(image_name, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, &jpeg);
    image.filter(Filter::DctDecode);
    image.width(pixmap.width() as i32);
    image.height(pixmap.height() as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([PDF_PAGE_WIDTH, 0.0, 0.0, PDF_PAGE_HEIGHT, 0.0, 0.0]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    let bytes = pdf.finish();
    debug!("Encoded PDF export ({} bytes, JPEG q{})", bytes.len(), jpeg_quality);
    Ok(ExportArtifact {
        filename: PDF_FILENAME,
        content_type: "application/pdf",
        bytes,
    })
}

/// Flatten the premultiplied surface to RGB and encode as baseline JPEG.
fn encode_jpeg(pixmap: &Pixmap, quality: u8) -> Result<Vec<u8>, ExportError> {
    let rgb: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
        .collect();

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, pixmap.width(), pixmap.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ExportError::Jpeg(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    fn pixmap() -> Pixmap {
        let mut pixmap = Pixmap::new(120, 160).unwrap();
        pixmap.fill(Color::from_rgba8(0x0b, 0x0d, 0x17, 255));
        pixmap
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_png_export_decodes_to_same_size() {
        let artifact = export_png(&pixmap()).unwrap();
        assert_eq!(artifact.filename, "starlight-map.png");
        assert_eq!(artifact.content_type, "image/png");
        assert_eq!(&artifact.bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 160));
        let px = decoded.to_rgba8().get_pixel(5, 5).0;
        assert_eq!(px, [0x0b, 0x0d, 0x17, 255]);
    }

    #[test]
    fn test_pdf_export_embeds_jpeg_on_letter_page() {
        let artifact = export_pdf(&pixmap(), DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(artifact.filename, "starlight-map.pdf");
        assert_eq!(artifact.content_type, "application/pdf");

        let bytes = &artifact.bytes;
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(bytes, b"/MediaBox [0 0 612 792]"));
        assert!(contains(bytes, b"/DCTDecode"));
        assert!(contains(bytes, b"/Im1"));
        // JPEG start-of-image marker
        assert!(contains(bytes, &[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_jpeg_quality_changes_size() {
        let mut noisy = Pixmap::new(64, 64).unwrap();
        for (i, px) in noisy.pixels_mut().iter_mut().enumerate() {
            let v = ((i * 37) % 251) as u8;
            *px = tiny_skia::PremultipliedColorU8::from_rgba(v, 255 - v, v / 2, 255).unwrap();
        }
        let high = encode_jpeg(&noisy, 95).unwrap();
        let low = encode_jpeg(&noisy, 10).unwrap();
        assert!(low.len() < high.len());
    }
}

//! Kind/extension to MIME type table for inline data URIs.

use crate::deliverable::DeliverableKind;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type used when a binary deliverable is embedded.
pub fn mime_for(kind: DeliverableKind, extension: Option<&str>) -> String {
    match kind {
        DeliverableKind::Image => match extension {
            Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
            Some("svg") => "image/svg+xml".to_string(),
            Some("tif") | Some("tiff") => "image/tiff".to_string(),
            Some(ext) => format!("image/{}", ext),
            None => OCTET_STREAM.to_string(),
        },
        DeliverableKind::Document => "application/pdf".to_string(),
        DeliverableKind::Slideshow | DeliverableKind::Text => OCTET_STREAM.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_use_extension() {
        assert_eq!(mime_for(DeliverableKind::Image, Some("png")), "image/png");
        assert_eq!(mime_for(DeliverableKind::Image, Some("webp")), "image/webp");
        assert_eq!(mime_for(DeliverableKind::Image, Some("jpg")), "image/jpeg");
        assert_eq!(mime_for(DeliverableKind::Image, Some("svg")), "image/svg+xml");
        assert_eq!(mime_for(DeliverableKind::Image, None), OCTET_STREAM);
    }

    #[test]
    fn documents_are_pdf_everything_else_octet_stream() {
        assert_eq!(mime_for(DeliverableKind::Document, Some("pdf")), "application/pdf");
        assert_eq!(mime_for(DeliverableKind::Slideshow, Some("pptx")), OCTET_STREAM);
    }
}

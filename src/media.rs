//! Media helpers: type detection, inline data URLs and the viewer page

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Cursor;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detects the media type of an upload. Magic bytes win over the file
/// extension; unknown data falls back to `application/octet-stream`.
pub fn detect_media_type(bytes: &[u8], file_name: Option<&str>) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    file_name
        .and_then(|name| mime_guess::from_path(name).first())
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Reads width and height from the image header without decoding pixels
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Lines shown under the photo on the viewer page
#[derive(Debug, Default)]
pub struct ViewerDetails<'a> {
    pub identification: Option<&'a str>,
    pub care_lines: Vec<(&'a str, &'a str)>,
}

/// Stand-alone HTML page showing one saved photo
pub fn viewer_html(name: &str, image_data_url: &str, details: &ViewerDetails<'_>) -> String {
    let name = escape_html(name);
    let mut extra = String::new();
    if let Some(species) = details.identification {
        extra.push_str(&format!(
            "    <p><b>Species:</b> {}</p>\n",
            escape_html(species)
        ));
    }
    for (label, value) in &details.care_lines {
        extra.push_str(&format!(
            "    <p><b>{}:</b> {}</p>\n",
            escape_html(label),
            escape_html(value)
        ));
    }

    format!(
        r#"<html>
  <head><title>{name}</title></head>
  <body style="text-align:center; padding:2em;">
    <h2>{name}</h2>
    <img src="{image_data_url}" style="max-width:90%; border:1px solid #ccc;" />
{extra}    <p><i>This is your saved photo.</i></p>
  </body>
</html>
"#
    )
}

/// Wraps an HTML page in a `data:text/html` URL so it opens in a new tab
pub fn html_data_url(html: &str) -> String {
    data_url("text/html", html.as_bytes())
}

/// One row of the gallery page
#[derive(Debug)]
pub struct GalleryItem<'a> {
    pub name: &'a str,
    pub image_data_url: String,
    pub viewer_url: String,
}

/// Page listing every saved photo with an "open in new tab" link
pub fn gallery_html(items: &[GalleryItem<'_>]) -> String {
    let mut body = String::new();
    if items.is_empty() {
        body.push_str("    <p>No photos saved yet.</p>\n");
    }
    for item in items {
        body.push_str(&format!(
            r#"    <div style="margin-bottom:2em;">
      <p><b>{name}</b></p>
      <img src="{image}" style="max-width:60%;" />
      <p><a href="{viewer}" target="_blank"><button style="padding:8px 14px;">Open in New Tab</button></a></p>
    </div>
"#,
            name = escape_html(item.name),
            image = item.image_data_url,
            viewer = item.viewer_url,
        ));
    }
    format!(
        "<html>\n  <head><title>Your Saved Photos</title></head>\n  <body style=\"padding:2em;\">\n    <h1>Your Saved Photos</h1>\n{}  </body>\n</html>\n",
        body
    )
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8,
        0xCF, 0xC0, 0xF0, 0x1F, 0x00, 0x05, 0x00, 0x01, 0xFF, 0x89, 0x99, 0x3D, 0x1D, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn sniffs_png_before_extension() {
        assert_eq!(detect_media_type(PNG_1X1, Some("photo.jpg")), "image/png");
    }

    #[test]
    fn falls_back_to_extension_then_octet_stream() {
        assert_eq!(detect_media_type(b"not an image", Some("leaf.jpeg")), "image/jpeg");
        assert_eq!(detect_media_type(b"not an image", None), OCTET_STREAM);
        assert_eq!(detect_media_type(b"not an image", Some("noext")), OCTET_STREAM);
    }

    #[test]
    fn data_url_has_prefix_and_payload() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn reads_png_dimensions() {
        let mut encoded = Cursor::new(Vec::new());
        image::RgbImage::new(3, 2)
            .write_to(&mut encoded, image::ImageFormat::Png)
            .unwrap();
        assert_eq!(image_dimensions(encoded.get_ref()), Some((3, 2)));
        assert_eq!(image_dimensions(b"garbage"), None);
    }

    #[test]
    fn viewer_escapes_name() {
        let html = viewer_html(
            "<Fern & co>",
            "data:image/png;base64,AA==",
            &ViewerDetails::default(),
        );
        assert!(html.contains("<title>&lt;Fern &amp; co&gt;</title>"));
        assert!(html.contains(r#"<img src="data:image/png;base64,AA==""#));
        assert!(!html.contains("Species"));
    }

    #[test]
    fn viewer_lists_species_and_care() {
        let details = ViewerDetails {
            identification: Some("Ocimum basilicum"),
            care_lines: vec![("Water", "Keep moist")],
        };
        let html = viewer_html("Basil", "data:,", &details);
        assert!(html.contains("<b>Species:</b> Ocimum basilicum"));
        assert!(html.contains("<b>Water:</b> Keep moist"));
    }

    #[test]
    fn empty_gallery_page() {
        assert!(gallery_html(&[]).contains("No photos saved yet."));
    }

    #[test]
    fn gallery_page_links_viewer() {
        let items = [GalleryItem {
            name: "Fern",
            image_data_url: "data:image/png;base64,AA==".to_string(),
            viewer_url: "data:text/html;base64,PGh0bWw+".to_string(),
        }];
        let html = gallery_html(&items);
        assert!(html.contains("<b>Fern</b>"));
        assert!(html.contains(r#"<a href="data:text/html;base64,PGh0bWw+" target="_blank">"#));
        assert!(!html.contains("No photos saved yet."));
    }

    #[test]
    fn html_data_url_is_base64_html() {
        assert!(html_data_url("<p>x</p>").starts_with("data:text/html;base64,"));
    }
}

//! QR image rendering.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::error::QrError;

/// Minimum rendered edge length in pixels.
pub const QR_MIN_SIZE: u32 = 256;

const DARK: &str = "#000000";
const LIGHT: &str = "#FFFFFF";

/// Render `payload` as an SVG QR code at error-correction level M.
pub fn render_svg(payload: &str) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| QrError::Render(e.to_string()))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .quiet_zone(true)
        .dark_color(svg::Color(DARK))
        .light_color(svg::Color(LIGHT))
        .build())
}

/// Wrap an SVG document in a `data:` URL.
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_deterministic() {
        let a = render_svg(r#"{"ticketId":"0x1"}"#).unwrap();
        let b = render_svg(r#"{"ticketId":"0x1"}"#).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("<svg"));
        assert!(a.contains(DARK));
        assert!(a.contains(LIGHT));
    }

    #[test]
    fn test_oversized_payload_fails() {
        let huge = "x".repeat(5_000);
        assert!(matches!(render_svg(&huge), Err(QrError::Render(_))));
    }

    #[test]
    fn test_data_url_prefix() {
        let url = svg_data_url("<svg/>");
        assert_eq!(url, "data:image/svg+xml;base64,PHN2Zy8+");
    }
}

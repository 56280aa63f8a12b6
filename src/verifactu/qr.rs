use super::Environment;
use super::chain;
use super::tree::Element;
use crate::core::VerifactuError;

/// Number of trailing fingerprint characters carried by the QR URL.
const HASH_SUFFIX_LEN: usize = 6;

/// Renders a verification URL into an image payload.
pub trait QrEncoder {
    fn encode(&self, url: &str) -> Result<String, VerifactuError>;
}

/// AEAT `ValidarQR` URL for a sealed invoice record:
/// `{host}?nif=…&numserie=…&fecha=…&importe=…&hash=…`.
pub fn verification_url(tree: &Element, environment: Environment) -> String {
    let params = [
        ("nif", tree.text_of("IDFactura/IDEmisorFactura")),
        ("numserie", tree.text_of("IDFactura/NumSerieFactura")),
        ("fecha", tree.text_of("IDFactura/FechaExpedicionFactura")),
        ("importe", tree.text_of("ImporteTotal")),
        ("hash", fingerprint_suffix(chain::record_fingerprint(tree))),
    ];
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", form_encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{query}", environment.qr_base_url())
}

fn fingerprint_suffix(fingerprint: &str) -> &str {
    fingerprint
        .char_indices()
        .rev()
        .nth(HASH_SUFFIX_LEN - 1)
        .map(|(i, _)| &fingerprint[i..])
        .unwrap_or(fingerprint)
}

/// `application/x-www-form-urlencoded` value encoding.
fn form_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => {
                out.push(char::from(byte))
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// SVG QR code as a `data:image/svg+xml;base64,…` URI.
#[cfg(feature = "qr")]
#[derive(Debug, Clone, Copy)]
pub struct SvgQrEncoder {
    /// Minimum width and height of the image, in pixels.
    pub min_size: u32,
}

#[cfg(feature = "qr")]
impl Default for SvgQrEncoder {
    fn default() -> Self {
        Self { min_size: 200 }
    }
}

#[cfg(feature = "qr")]
impl QrEncoder for SvgQrEncoder {
    fn encode(&self, url: &str) -> Result<String, VerifactuError> {
        use base64::Engine;
        use qrcode::render::svg;
        use qrcode::{EcLevel, QrCode};

        let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
            .map_err(|e| VerifactuError::Qr(e.to_string()))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.min_size, self.min_size)
            .build();
        Ok(format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(image)
        ))
    }
}

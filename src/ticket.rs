use base64::{Engine as _, engine::general_purpose::STANDARD};
use qrcode::{QrCode, render::svg};
use rand::Rng;

use crate::error::AppError;

const ID_PREFIX: &str = "VEL-";
const ID_SUFFIX_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Ticket identifier: fixed program tag plus a random suffix. The suffix
/// space is 36^9, so ids are not re-checked against existing rows; the
/// primary key catches the astronomically unlikely collision.
pub fn new_registration_id() -> String {
    let mut rng = rand::thread_rng();

    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();

    format!("{ID_PREFIX}{suffix}")
}

/// Renders the id as a QR code and wraps it in a data URI the caller can
/// drop straight into an `<img>` tag.
pub fn qr_data_uri(registration_id: &str) -> Result<String, AppError> {
    let code = QrCode::new(registration_id.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("QR encoding failed: {e}")))?;

    let image = code
        .render()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image)
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_have_the_fixed_prefix_and_alphabet() {
        let id = new_registration_id();
        let suffix = id.strip_prefix(ID_PREFIX).expect("missing prefix");

        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn ids_do_not_collide_casually() {
        let ids: HashSet<String> = (0..1000).map(|_| new_registration_id()).collect();

        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn qr_is_an_inline_svg() {
        let uri = qr_data_uri("VEL-123456789").unwrap();

        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        assert!(uri.len() > "data:image/svg+xml;base64,".len());
    }
}

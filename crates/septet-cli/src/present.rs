//! Rendering byte buffers as delimited text.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number format for printed bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain decimal, `138`
    Decimal,
    /// Prefixed hex, `0x8A`
    Hex,
}

/// Render `bytes` joined by `separator`.
pub fn render(bytes: &[u8], format: OutputFormat, separator: &str) -> String {
    let out = bytes
        .iter()
        .map(|b| match format {
            OutputFormat::Decimal => b.to_string(),
            OutputFormat::Hex => format!("0x{b:02X}"),
        })
        .collect::<Vec<_>>()
        .join(separator);
    tracing::debug!(values = bytes.len(), ?format, "rendered output");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[], OutputFormat::Decimal, ","), "");
    }

    #[test]
    fn test_render_decimal() {
        assert_eq!(
            render(&[0x01, 0x82, 0x03, 0x03], OutputFormat::Decimal, ","),
            "1,130,3,3"
        );
    }

    #[test]
    fn test_render_hex() {
        assert_eq!(render(&[0x8A, 0x03], OutputFormat::Hex, ", "), "0x8A, 0x03");
    }

    #[test]
    fn test_render_hex_pads_to_two_digits() {
        assert_eq!(render(&[0x00, 0x0F, 0xFF], OutputFormat::Hex, ","), "0x00,0x0F,0xFF");
    }

    #[test]
    fn test_render_single() {
        assert_eq!(render(&[42], OutputFormat::Decimal, ","), "42");
    }
}

use serde::{Deserialize, Serialize};

/// Barcode symbology reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symbology {
    QrCode,
    Code128,
    Code39,
    Code93,
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Codabar,
    Itf,
    /// Typed in by an operator rather than decoded.
    Manual,
    Unknown,
}

impl Symbology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::QrCode => "QR_CODE",
            Symbology::Code128 => "CODE128",
            Symbology::Code39 => "CODE39",
            Symbology::Code93 => "CODE93",
            Symbology::Ean13 => "EAN13",
            Symbology::Ean8 => "EAN8",
            Symbology::UpcA => "UPC_A",
            Symbology::UpcE => "UPC_E",
            Symbology::Codabar => "CODABAR",
            Symbology::Itf => "ITF",
            Symbology::Manual => "MANUAL",
            Symbology::Unknown => "UNKNOWN",
        }
    }

    pub fn is_two_dimensional(&self) -> bool {
        matches!(self, Symbology::QrCode)
    }
}

impl core::fmt::Display for Symbology {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient decoder-name mapping. Accepts both `QR_CODE` and the zbar
/// spelling `QRCODE`, ignores case and separators, and falls back to
/// `Unknown`.
impl From<&str> for Symbology {
    fn from(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "QRCODE" | "QR" => Symbology::QrCode,
            "CODE128" => Symbology::Code128,
            "CODE39" => Symbology::Code39,
            "CODE93" => Symbology::Code93,
            "EAN13" => Symbology::Ean13,
            "EAN8" => Symbology::Ean8,
            "UPCA" => Symbology::UpcA,
            "UPCE" => Symbology::UpcE,
            "CODABAR" => Symbology::Codabar,
            "ITF" | "I25" => Symbology::Itf,
            "MANUAL" => Symbology::Manual,
            _ => Symbology::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_spellings_map_to_same_symbology() {
        assert_eq!(Symbology::from("QRCODE"), Symbology::QrCode);
        assert_eq!(Symbology::from("qr_code"), Symbology::QrCode);
        assert_eq!(Symbology::from("I25"), Symbology::Itf);
        assert_eq!(Symbology::from("DATABAR"), Symbology::Unknown);
    }

    #[test]
    fn serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&Symbology::QrCode).unwrap(), "\"QR_CODE\"");
        assert_eq!(serde_json::to_string(&Symbology::Ean13).unwrap(), "\"EAN13\"");
        assert_eq!(serde_json::to_string(&Symbology::UpcA).unwrap(), "\"UPC_A\"");
    }
}

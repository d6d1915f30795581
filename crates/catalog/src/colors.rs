//! Colour code dictionary used by the stock report.

/// Short colour code → display name, as printed in the dealer's stock export.
const COLOR_NAMES: &[(&str, &str)] = &[
    ("WH", "Putih (White)"),
    ("BK", "Hitam (Black)"),
    ("RD", "Merah (Red)"),
    ("SV", "Silver"),
    ("BL", "Biru (Blue)"),
    ("GY", "Abu-abu (Grey)"),
    ("BR", "Coklat (Brown)"),
    ("MH", "Matte Hitam"),
    ("MB", "Matte Biru"),
    ("MC", "Matte Coklat"),
    ("MR", "Matte Merah"),
    ("MS", "Matte Silver"),
    ("GN", "Hijau (Green)"),
    ("GR", "Hijau (Green)"),
    ("OR", "Orange"),
    ("YW", "Kuning (Yellow)"),
    ("PK", "Pink"),
    ("CR", "Cream"),
    ("BW", "Brown (Coklat)"),
    ("BP", "Biru Putih"),
    ("BB", "Biru Hitam"),
    ("PD", "Putih Doff"),
    ("PH", "Putih Hitam"),
    ("CW", "Cream White"),
];

/// Display name for an upper-cased colour code, `None` when unmapped.
pub fn color_name(code: &str) -> Option<&'static str> {
    COLOR_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

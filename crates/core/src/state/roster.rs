use std::collections::BTreeMap;

/// Complementary palette: distinct hues, same saturation/brightness, readable
/// on white.
pub const USER_COLOR_PALETTE: [&str; 18] = [
    "#0d47a1", "#b71c1c", "#1b5e20", "#e65100", "#4a148c", "#006064", "#bf360c", "#283593",
    "#c62828", "#2e7d32", "#ad1457", "#1565c0", "#558b2f", "#6a1b9a", "#0277bd", "#00838f",
    "#6d4c41", "#37474f",
];

/// A participant as tracked on the shared board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct UserPresence {
    pub name: String,
    /// Milliseconds since the Unix epoch; absent in blobs written before
    /// presence tracking existed.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub last_seen: Option<i64>,
}

impl UserPresence {
    pub fn new(name: impl Into<String>, last_seen: i64) -> Self {
        Self {
            name: name.into(),
            last_seen: Some(last_seen),
        }
    }
}

/// Picks the color for the next joiner: the first palette entry nobody uses
/// yet, or, once all 18 are taken, the palette repeats by join order.
pub fn next_palette_color(assigned: &BTreeMap<String, String>) -> &'static str {
    let used: std::collections::BTreeSet<&str> =
        assigned.values().map(String::as_str).collect();
    for color in USER_COLOR_PALETTE {
        if !used.contains(color) {
            return color;
        }
    }
    USER_COLOR_PALETTE[assigned.len() % USER_COLOR_PALETTE.len()]
}

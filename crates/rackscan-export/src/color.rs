use regex::Regex;
use std::sync::OnceLock;

fn re_rgb() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r"^rgb\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)$").expect("valid regex")
    })
}

const NAMED: [(&str, &str); 8] = [
    ("red", "#ff0000"),
    ("green", "#00ff00"),
    ("blue", "#0000ff"),
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("silver", "#c0c0c0"),
    ("gray", "#808080"),
    ("grey", "#808080"),
];

/// Canvas color for an SVG paint value.
///
/// Hex values pass through, `rgb(r,g,b)` and a small named table become `#rrggbb`, anything
/// else (e.g. `none`, `url(#grad)`) is returned unchanged. Blank input yields `None`.
pub fn normalize_color(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.starts_with('#') {
        return Some(s.to_string());
    }
    if let Some(caps) = re_rgb().captures(s) {
        let channel = |i: usize| -> u8 {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .map(|v| v.min(255) as u8)
                .unwrap_or(0)
        };
        return Some(format!("#{:02x}{:02x}{:02x}", channel(1), channel(2), channel(3)));
    }
    let lower = s.to_ascii_lowercase();
    if let Some((_, hex)) = NAMED.iter().find(|(name, _)| *name == lower) {
        return Some((*hex).to_string());
    }
    Some(s.to_string())
}

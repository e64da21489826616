//! Lexical scans over path data. Nothing here interprets command semantics.

use crate::geom::BoundingBox;
use crate::transform::NUM;
use regex::Regex;
use std::sync::OnceLock;

fn re_number() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(NUM).expect("valid regex"))
}

fn re_integer() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

pub fn numbers(d: &str) -> impl Iterator<Item = f64> + '_ {
    re_number()
        .find_iter(d)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
}

/// Every numeric token paired consecutively as `(x, y)`; a trailing odd token is dropped.
pub fn coordinate_pairs(d: &str) -> Vec<(f64, f64)> {
    let nums: Vec<f64> = numbers(d).collect();
    nums.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

pub fn bounds(d: &str) -> BoundingBox {
    BoundingBox::from_points(coordinate_pairs(d))
}

/// Coordinates of the first `M`/`m` command, when it is followed by two numbers.
pub fn first_move(d: &str) -> Option<(f64, f64)> {
    let start = d.find(['M', 'm'])?;
    let rest = &d[start + 1..];
    let mut end = 0;
    let mut xy = [0.0; 2];
    for slot in &mut xy {
        let m = re_number().find_at(rest, end)?;
        if !rest[end..m.start()]
            .chars()
            .all(|c| c.is_whitespace() || c == ',')
        {
            return None;
        }
        *slot = m.as_str().parse::<f64>().ok()?;
        end = m.end();
    }
    Some((xy[0], xy[1]))
}

/// Largest run of decimal digits, read as an integer. Runs too long for `u64` saturate.
pub fn max_integer(d: &str) -> Option<u64> {
    re_integer()
        .find_iter(d)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .max()
}

/// Per-command occurrence counts. Absolute and relative forms count together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandCounts {
    pub moves: usize,
    pub lines: usize,
    pub horizontal: usize,
    pub vertical: usize,
    pub curves: usize,
    pub smooth_curves: usize,
    pub quadratics: usize,
    pub smooth_quadratics: usize,
    pub arcs: usize,
    pub closes: usize,
}

impl CommandCounts {
    pub fn of(d: &str) -> Self {
        let mut c = Self::default();
        for ch in d.chars() {
            match ch.to_ascii_uppercase() {
                'M' => c.moves += 1,
                'L' => c.lines += 1,
                'H' => c.horizontal += 1,
                'V' => c.vertical += 1,
                'C' => c.curves += 1,
                'S' => c.smooth_curves += 1,
                'Q' => c.quadratics += 1,
                'T' => c.smooth_quadratics += 1,
                'A' => c.arcs += 1,
                'Z' => c.closes += 1,
                _ => {}
            }
        }
        c
    }
}

/// Path data split into `(command, args)` segments, in order.
///
/// Numbers before the first command letter are ignored.
pub fn segments(d: &str) -> Vec<(char, Vec<f64>)> {
    let mut out: Vec<(char, Vec<f64>)> = Vec::new();
    let mut start: Option<(char, usize)> = None;
    for (i, ch) in d.char_indices() {
        if !is_command(ch) {
            continue;
        }
        if let Some((cmd, from)) = start {
            out.push((cmd, numbers(&d[from..i]).collect()));
        }
        start = Some((ch, i + ch.len_utf8()));
    }
    if let Some((cmd, from)) = start {
        out.push((cmd, numbers(&d[from..]).collect()));
    }
    out
}

fn is_command(ch: char) -> bool {
    matches!(
        ch.to_ascii_uppercase(),
        'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A' | 'Z'
    )
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rand::Rng;

use crate::models::TxType;

pub const SATURATION: f64 = 70.0;
pub const LIGHTNESS: f64 = 50.0;
pub const MIN_HUE_DIFF: u32 = 60;
const HUE_DIFF_STEP: u32 = 10;
const HUE_DIFF_FLOOR: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

pub fn start_hue(kind: TxType) -> f64 {
    match kind {
        TxType::Expense => 0.0,
        TxType::Income => 210.0,
    }
}

/// Circular distance between two hues in degrees, in `[0, 180]`.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 { 360.0 - diff } else { diff }
}

pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let l = l / 100.0;
    let a = s * l.min(1.0 - l) / 100.0;
    let channel = |n: f64| -> u8 {
        let k = (n + h / 30.0) % 12.0;
        let c = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * c).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(8.0), channel(4.0))
}

/// Parses `#abc` or `#aabbcc`. Anything else reads as black.
pub fn hex_to_hsl(hex: &str) -> Hsl {
    let (r, g, b) = parse_rgb(hex).unwrap_or((0, 0, 0));
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);

    let cmax = r.max(g).max(b);
    let cmin = r.min(g).min(b);
    let delta = cmax - cmin;

    let mut h = if delta == 0.0 {
        0.0
    } else if cmax == r {
        ((g - b) / delta) % 6.0
    } else if cmax == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    h = (h * 60.0 + 0.5).floor();
    if h < 0.0 {
        h += 360.0;
    }

    let l = (cmax + cmin) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    Hsl {
        h,
        s: (s * 1000.0).round() / 10.0,
        l: (l * 1000.0).round() / 10.0,
    }
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.is_ascii() {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let doubled: Vec<String> = digits.chars().map(|c| format!("{c}{c}")).collect();
            Some((byte(&doubled[0])?, byte(&doubled[1])?, byte(&doubled[2])?))
        }
        6 => Some((byte(&digits[0..2])?, byte(&digits[2..4])?, byte(&digits[4..6])?)),
        _ => None,
    }
}

/// Picks a color for a new category of `kind`, using the thread RNG only when
/// every separation threshold fails.
pub fn assign_color<S: AsRef<str>>(kind: TxType, existing: &[S]) -> String {
    assign_color_with(kind, existing, &mut rand::thread_rng())
}

pub fn assign_color_with<S, R>(kind: TxType, existing: &[S], rng: &mut R) -> String
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut hues: Vec<f64> = existing.iter().map(|c| hex_to_hsl(c.as_ref()).h).collect();
    hues.sort_by(|a, b| a.total_cmp(b));

    let start = start_hue(kind);
    let hue = find_hue(start, &hues).unwrap_or_else(|| {
        tracing::debug!(%kind, existing = hues.len(), "hue search exhausted, using random hue");
        (start + rng.gen_range(0.0..360.0)) % 360.0
    });
    hsl_to_hex(hue, SATURATION, LIGHTNESS)
}

fn find_hue(start: f64, hues: &[f64]) -> Option<f64> {
    let mut min_diff = MIN_HUE_DIFF;
    while min_diff >= HUE_DIFF_FLOOR {
        let step = min_diff as f64;
        let attempts = 360 / min_diff + 5;
        let mut candidate = start;
        for _ in 0..attempts {
            if hues.iter().all(|&e| hue_distance(candidate, e) >= step) {
                return Some(candidate);
            }
            candidate = (candidate + step) % 360.0;
        }
        min_diff -= HUE_DIFF_STEP;
    }
    None
}

//! Just enough CSS color and gradient parsing to paint exported banners.

use image::Rgba;

/// Color used when a CSS value cannot be painted
pub const FALLBACK_GRAY: Rgba<u8> = Rgba([209, 213, 219, 255]);

/// Parse a CSS color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` or a basic keyword
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }

    let named = match lower.as_str() {
        "white" => [255, 255, 255, 255],
        "black" => [0, 0, 0, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "blue" => [0, 0, 255, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        "transparent" => [0, 0, 0, 0],
        _ => return None,
    };
    Some(Rgba(named))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }

    let channel = |p: &str| -> Option<u8> {
        match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok().map(|v| (v.clamp(0.0, 100.0) * 2.55).round() as u8),
            None => p.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8),
        }
    };
    let alpha = match parts.get(3) {
        None => 255,
        Some(p) => match p.strip_suffix('%') {
            Some(pct) => (pct.parse::<f32>().ok()?.clamp(0.0, 100.0) * 2.55).round() as u8,
            None => (p.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        },
    };

    Some(Rgba([channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha]))
}

/// A parsed `linear-gradient(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// CSS angle in degrees: 0 points up, 90 points right
    pub angle: f32,
    /// Color stops with positions in `0.0..=1.0`, sorted
    pub stops: Vec<(f32, Rgba<u8>)>,
}

impl LinearGradient {
    /// Parse `linear-gradient(<angle>|to <side>, <color> [<pct>%], ...)`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let inner = value
            .strip_prefix("linear-gradient(")?
            .strip_suffix(')')?;

        let args = split_top_level(inner);
        let (angle, color_args) = match args.first().and_then(|a| parse_direction(a)) {
            Some(angle) => (angle, &args[1..]),
            None => (180.0, &args[..]),
        };

        let mut stops: Vec<(Option<f32>, Rgba<u8>)> = Vec::new();
        for arg in color_args {
            let (color, position) = split_stop(arg);
            stops.push((position, parse_color(color)?));
        }
        if stops.len() < 2 {
            return None;
        }

        // Unpositioned stops are spread evenly between their neighbours
        let last = stops.len() - 1;
        if stops[0].0.is_none() {
            stops[0].0 = Some(0.0);
        }
        if stops[last].0.is_none() {
            stops[last].0 = Some(1.0);
        }
        let mut i = 1;
        while i < last {
            if stops[i].0.is_some() {
                i += 1;
                continue;
            }
            let start = i - 1;
            let mut end = i;
            while stops[end].0.is_none() {
                end += 1;
            }
            let from = stops[start].0.unwrap_or(0.0);
            let to = stops[end].0.unwrap_or(1.0);
            for (k, stop) in stops.iter_mut().enumerate().take(end).skip(i) {
                stop.0 = Some(from + (to - from) * (k - start) as f32 / (end - start) as f32);
            }
            i = end;
        }

        let mut resolved: Vec<(f32, Rgba<u8>)> = stops.into_iter().map(|(p, c)| (p.unwrap_or(0.0), c)).collect();
        resolved.sort_by(|a, b| a.0.total_cmp(&b.0));
        Some(Self { angle, stops: resolved })
    }

    /// Color at `t` along the gradient line
    pub fn color_at(&self, t: f32) -> Rgba<u8> {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for pair in self.stops.windows(2) {
            let ((p0, c0), (p1, c1)) = (pair[0], pair[1]);
            if t >= p0 && t <= p1 {
                let span = (p1 - p0).max(f32::EPSILON);
                return lerp(c0, c1, (t - p0) / span);
            }
        }
        last.1
    }

    /// Color of pixel (x, y) in a `width`×`height` box
    pub fn sample(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba<u8> {
        let radians = self.angle.to_radians();
        let (dx, dy) = (radians.sin(), -radians.cos());
        let (w, h) = (width as f32, height as f32);
        let length = (w * dx.abs() + h * dy.abs()).max(f32::EPSILON);

        let px = x as f32 + 0.5 - w / 2.0;
        let py = y as f32 + 0.5 - h / 2.0;
        self.color_at((px * dx + py * dy) / length + 0.5)
    }
}

fn lerp(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let mix = |i: usize| (a.0[i] as f32 + (b.0[i] as f32 - a.0[i] as f32) * t).round() as u8;
    Rgba([mix(0), mix(1), mix(2), mix(3)])
}

fn parse_direction(arg: &str) -> Option<f32> {
    let arg = arg.trim();
    if let Some(deg) = arg.strip_suffix("deg") {
        return deg.trim().parse().ok();
    }
    if let Some(turn) = arg.strip_suffix("turn") {
        return turn.trim().parse::<f32>().ok().map(|t| t * 360.0);
    }
    let side = arg.strip_prefix("to ")?.trim();
    match side {
        "top" => Some(0.0),
        "right" => Some(90.0),
        "bottom" => Some(180.0),
        "left" => Some(270.0),
        "top right" | "right top" => Some(45.0),
        "bottom right" | "right bottom" => Some(135.0),
        "bottom left" | "left bottom" => Some(225.0),
        "top left" | "left top" => Some(315.0),
        _ => None,
    }
}

/// Split on commas that are not inside parentheses
fn split_top_level(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(value[start..].trim());
    parts
}

/// Separate `"#fff 55%"` into color and position
fn split_stop(arg: &str) -> (&str, Option<f32>) {
    let arg = arg.trim();
    if let Some((color, position)) = arg.rsplit_once(' ') {
        if let Some(pct) = position.strip_suffix('%').and_then(|p| p.parse::<f32>().ok()) {
            return (color.trim(), Some((pct / 100.0).clamp(0.0, 1.0)));
        }
    }
    (arg, None)
}

//! Hex and RGB color conversion.

use crate::format::{TransformError, TransformResult, param};

/// Parses `#RGB`, `RGB`, `#RRGGBB` or `RRGGBB`.
///
/// # Errors
///
/// Fails on any other length or a non-hex digit.
pub fn parse_hex(input: &str) -> Result<(u8, u8, u8), TransformError> {
    let digits = input.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return Err(TransformError::new(format!(
            "`{}` contains non-hex characters",
            input.trim()
        )));
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => {
            return Err(TransformError::new(format!(
                "`{}` is not a valid hex color; use 3 or 6 hex digits like #FF0000",
                input.trim()
            )));
        }
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| {
            TransformError::new(format!("`{}` contains non-hex characters", input.trim()))
        })
    };
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// HSL triple with hue in degrees and saturation/lightness in percent.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (u16, u8, u8) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    if delta == 0.0 {
        return (0, 0, (lightness * 100.0).round() as u8);
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    let hue = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    (
        (hue.round() as u16) % 360,
        (saturation * 100.0).round() as u8,
        (lightness * 100.0).round() as u8,
    )
}

fn describe(r: u8, g: u8, b: u8) -> String {
    let (h, s, l) = rgb_to_hsl(r, g, b);
    format!(
        "## Color Conversion\n\n- HEX: #{:02X}{:02X}{:02X}\n- RGB: rgb({}, {}, {})\n\
         - HSL: hsl({}, {}%, {}%)",
        r, g, b, r, g, b, h, s, l
    )
}

/// `HEX_RGB hex`
pub fn hex_to_rgb(params: &[String]) -> TransformResult {
    let (r, g, b) = parse_hex(param(params, 0))?;
    Ok(describe(r, g, b))
}

/// `RGB_HEX r;;;g;;;b`
pub fn rgb_to_hex(params: &[String]) -> TransformResult {
    let channel = |i: usize, label: &str| {
        let raw = param(params, i);
        raw.parse::<u8>().map_err(|_| {
            TransformError::new(format!(
                "{} must be a whole number from 0 to 255, got `{}`",
                label, raw
            ))
        })
    };
    let (r, g, b) = (channel(0, "Red")?, channel(1, "Green")?, channel(2, "Blue")?);
    Ok(describe(r, g, b))
}

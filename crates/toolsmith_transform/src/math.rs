//! Percentage arithmetic.

use crate::format::{TransformResult, format_number, param, parse_number};

/// `PERCENT_CALC percent;;;value`
pub fn percent(params: &[String]) -> TransformResult {
    let pct = parse_number(param(params, 0), "Percentage")?;
    let value = parse_number(param(params, 1), "Value")?;

    let portion = value * pct / 100.0;
    let (p, v) = (format_number(pct), format_number(value));
    let mut lines = vec![
        format!(
            "## Percentage Calculation\n\n**{}% of {} = {}**\n",
            p,
            v,
            format_number(portion)
        ),
        format!("- {} increased by {}%: {}", v, p, format_number(value + portion)),
        format!("- {} decreased by {}%: {}", v, p, format_number(value - portion)),
    ];
    if value != 0.0 {
        lines.push(format!(
            "- {} is {}% of {}",
            p,
            format_number(pct / value * 100.0),
            v
        ));
    }
    Ok(lines.join("\n"))
}

//! PostScript calculator (FunctionType 4) emission.
//!
//! The calculator language has an operand stack and nothing else: no
//! variables, no loops, no early return. The escape-time loop is therefore
//! unrolled into right-nested `ifelse` blocks, one per level, each sitting
//! in the else branch of the level before it.
//!
//! Stack layout while iterating: `c.im c.re z.im z.re`.

use crate::escape::{IN_SET, palette_color};
use crate::model::{Config, Rgb};

/// Advances `z := z^2 + c` in place, leaving `c.im c.re z'.im z'.re`.
const STEP: &str = "2 copy 2 mul mul 4 index add 3 1 roll dup mul exch dup mul sub 2 index add";

/// Pushes `|z|^2` on top of the stack without consuming `z`.
const MODULUS: &str = "2 copy dup mul exch dup mul add";

/// Formats a real for the calculator, e.g. `0.8`, `-0.6`, `15`.
pub fn number(value: f64) -> String {
    format!("{value}")
}

/// A DeviceRGB component in 0..1, trimmed to four decimals.
fn component(value: f64) -> String {
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_string() } else { s.to_string() }
}

pub fn color_operands(color: Rgb) -> String {
    color
        .components()
        .iter()
        .map(|&c| component(c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Branch that drops the working values and pushes the final colour.
fn terminate(color: Rgb) -> String {
    format!("{{ pop pop pop pop {} }}", color_operands(color))
}

/// Body of the escape-time function, braces included.
///
/// Starts from `z = 0`. Each level tests `|z|^2` and either pushes its band
/// colour or, in the else branch, steps `z` and descends to the next level.
/// Contains exactly `config.depth` `ifelse` operators. Level `k` is indented
/// by `k` spaces; the indentation carries no meaning.
pub fn escape_function(config: &Config) -> Vec<String> {
    let scale = number(config.scale);
    let threshold = number(config.threshold);
    let depth = config.depth;

    let mut lines = vec![
        "{".to_string(),
        format!("{scale} div"),
        format!("exch {scale} div"),
        format!("{} add", number(config.shift)),
        "0 0".to_string(),
    ];

    if depth == 0 {
        lines.push(format!("pop pop pop pop {}", color_operands(IN_SET)));
        lines.push("}".to_string());
        return lines;
    }

    for level in 0..depth {
        let pad = " ".repeat(level);
        if level > 0 {
            lines.push(format!("{}{{", " ".repeat(level - 1)));
            lines.push(format!("{pad}{STEP}"));
        }
        let color = palette_color(level, config.palette);
        lines.push(format!("{pad}{MODULUS} {threshold} ge {}", terminate(color)));
    }
    lines.push(format!("{}{} ifelse", " ".repeat(depth - 1), terminate(IN_SET)));
    for level in (1..depth).rev() {
        lines.push(format!("{}}} ifelse", " ".repeat(level - 1)));
    }
    lines.push("}".to_string());
    lines
}

/// A lone `z := z^2 + c` step over four inputs `c.im c.re z.im z.re`.
///
/// Written as an unreferenced object; no page or shading uses it.
pub fn step_function() -> Vec<String> {
    vec!["{".to_string(), STEP.to_string(), "}".to_string()]
}

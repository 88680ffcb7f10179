//! Colour banding and the plain-loop form of the escape-time iteration.
//!
//! `pdf::function` translates the loop in [`escape_color`] into nested
//! calculator branches; both must agree on every point.

use crate::model::{Config, PaletteMode, Rgb};

/// Gradient from q9f's answer on the Wikipedia Mandelbrot colouring.
pub const COLOURS: [Rgb; 16] = [
    Rgb([66, 30, 15]),    // brown 3
    Rgb([25, 7, 26]),     // dark violet
    Rgb([9, 1, 47]),      // darkest blue
    Rgb([4, 4, 73]),      // blue 5
    Rgb([0, 7, 100]),     // blue 4
    Rgb([12, 44, 138]),   // blue 3
    Rgb([24, 82, 177]),   // blue 2
    Rgb([57, 125, 209]),  // blue 1
    Rgb([134, 181, 229]), // blue 0
    Rgb([211, 236, 248]), // lightest blue
    Rgb([241, 233, 191]), // lightest yellow
    Rgb([248, 201, 95]),  // light yellow
    Rgb([255, 170, 0]),   // dirty yellow
    Rgb([204, 128, 0]),   // brown 0
    Rgb([153, 87, 0]),    // brown 1
    Rgb([106, 52, 3]),    // brown 2
];

/// Deepest level whose palette index stays inside [`COLOURS`].
pub const MAX_BANDED_DEPTH: usize = COLOURS.len() * 2;

pub const IN_SET: Rgb = Rgb::BLACK;

/// Colour for a point that escapes at `level` (0-based).
///
/// Even levels are always black, giving the equipotential banding.
/// Odd levels read `COLOURS[level / 2]`, wrapping past the end of the table.
pub fn palette_color(level: usize, mode: PaletteMode) -> Rgb {
    if level % 2 == 0 {
        return Rgb::BLACK;
    }
    match mode {
        PaletteMode::BlackAndWhite => Rgb::WHITE,
        PaletteMode::Colour => COLOURS[(level / 2) % COLOURS.len()],
    }
}

/// Escape level of the shading-space point `(x, y)`, or `None` if it never escapes.
///
/// The point is first mapped to `c = (x / scale + shift, y / scale)`. The
/// iteration starts from `z = 0`; each level tests `|z|^2 >= threshold`
/// before advancing `z := z^2 + c`.
pub fn escape_level(config: &Config, x: f64, y: f64) -> Option<usize> {
    let c_im = y / config.scale;
    let c_re = x / config.scale + config.shift;
    let (mut re, mut im) = (0.0_f64, 0.0_f64);

    for level in 0..config.depth {
        if re * re + im * im >= config.threshold {
            return Some(level);
        }
        // Operation order matches the emitted program so results are bit-identical.
        let next_im = im * (re * 2.0) + c_im;
        let next_re = re * re - im * im + c_re;
        re = next_re;
        im = next_im;
    }
    None
}

pub fn escape_color(config: &Config, x: f64, y: f64) -> Rgb {
    match escape_level(config, x, y) {
        Some(level) => palette_color(level, config.palette),
        None => IN_SET,
    }
}

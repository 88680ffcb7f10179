use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Channel values scaled to the 0..1 range DeviceRGB expects.
    pub fn components(self) -> [f64; 3] {
        self.0.map(|c| c as f64 / 255.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteMode {
    Colour,
    BlackAndWhite,
}

impl PaletteMode {
    pub fn label(self) -> &'static str {
        match self {
            PaletteMode::Colour => "Colour",
            PaletteMode::BlackAndWhite => "Black and White",
        }
    }
}

/// Line terminator used for every emitted line. PDF accepts all three.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Newline {
    Cr,
    Lf,
    #[default]
    CrLf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Cr => "\r",
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
        }
    }

    pub fn width(self) -> usize {
        self.as_str().len()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    pub author: String,
    /// Added to the real axis after scaling.
    pub shift: f64,
    /// Divisor applied to both shading coordinates.
    pub scale: f64,
    /// Number of escape bands. Above 32 the colour table wraps.
    pub depth: usize,
    /// Squared modulus at which a point counts as escaped.
    pub threshold: f64,
    pub palette: PaletteMode,
    pub newline: Newline,
    /// Emit the unreferenced single-step function object.
    pub legacy_step_function: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Mandelbrot Set".into(),
            author: "S Combes".into(),
            shift: -0.6,
            scale: 0.8,
            depth: 32,
            threshold: 15.0,
            palette: PaletteMode::Colour,
            newline: Newline::CrLf,
            legacy_step_function: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(Error::InvalidConfig(format!(
                "scale must be finite and non-zero, got {}",
                self.scale
            )));
        }
        if !self.shift.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "shift must be finite, got {}",
                self.shift
            )));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "threshold must be finite and positive, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Deterministic output name, e.g. `Mandelbrot Set Colour.pdf`.
    pub fn file_name(&self) -> String {
        format!("Mandelbrot Set {}.pdf", self.palette.label())
    }
}

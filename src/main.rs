use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mandelbrot_pdf::{Config, Newline, PaletteMode};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NewlineArg {
    Cr,
    Lf,
    Crlf,
}

impl From<NewlineArg> for Newline {
    fn from(value: NewlineArg) -> Self {
        match value {
            NewlineArg::Cr => Newline::Cr,
            NewlineArg::Lf => Newline::Lf,
            NewlineArg::Crlf => Newline::CrLf,
        }
    }
}

/// Write a PDF whose Mandelbrot set is drawn by the viewer from a calculator function.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory the PDF is written into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    #[arg(long, default_value = "Mandelbrot Set")]
    title: String,

    #[arg(long, default_value = "S Combes")]
    author: String,

    /// Real-axis translation applied after scaling
    #[arg(long, default_value_t = -0.6, allow_hyphen_values = true)]
    shift: f64,

    /// Zoom divisor applied to both axes
    #[arg(long, default_value_t = 0.8)]
    scale: f64,

    /// Escape bands to emit; colours repeat beyond 32
    #[arg(long, default_value_t = 32)]
    depth: usize,

    /// Squared modulus at which a point counts as escaped
    #[arg(long, default_value_t = 15.0)]
    threshold: f64,

    /// White bands instead of the colour gradient
    #[arg(long)]
    black_and_white: bool,

    #[arg(long, value_enum, default_value_t = NewlineArg::Crlf)]
    newline: NewlineArg,

    /// Skip the unreferenced single-step function object
    #[arg(long)]
    no_legacy_function: bool,

    /// Log progress (repeat for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            title: self.title.clone(),
            author: self.author.clone(),
            shift: self.shift,
            scale: self.scale,
            depth: self.depth,
            threshold: self.threshold,
            palette: if self.black_and_white {
                PaletteMode::BlackAndWhite
            } else {
                PaletteMode::Colour
            },
            newline: self.newline.into(),
            legacy_step_function: !self.no_legacy_function,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match mandelbrot_pdf::generate(&cli.config(), &cli.out_dir) {
        Ok(path) => {
            println!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

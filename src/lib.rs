mod error;
pub mod escape;
pub mod model;
pub mod pdf;

pub use error::Error;
pub use model::{Config, Newline, PaletteMode, Rgb};

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};

/// Builds the complete PDF in memory.
pub fn render_pdf(config: &Config, now: DateTime<Utc>) -> Result<Vec<u8>, Error> {
    config.validate()?;
    Ok(pdf::render(config, now))
}

/// Renders with the current time and writes `config.file_name()` into `out_dir`.
pub fn generate(config: &Config, out_dir: &Path) -> Result<PathBuf, Error> {
    let t0 = Instant::now();

    let bytes = render_pdf(config, Utc::now())?;
    let t_render = t0.elapsed();

    let output = out_dir.join(config.file_name());
    std::fs::write(&output, &bytes).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, output.display()),
        ))
    })?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(output)
}

pub mod function;
pub mod writer;

use chrono::{DateTime, Utc};

use crate::escape::MAX_BANDED_DEPTH;
use crate::model::{Config, PaletteMode};

use function::{escape_function, step_function};
use writer::{DocumentBuilder, Ref, RefAllocator, stream_object};

const PDF_VERSION: &str = "1.5";
const CREATOR: &str = "mandelbrot-pdf";

/// Landscape A4 in points.
const PAGE_WIDTH: f64 = 842.0;
const PAGE_HEIGHT: f64 = 595.0;

/// Object ids, allocated in write order so the builder sees them ascending.
struct Layout {
    catalog: Ref,
    outlines: Ref,
    pages: Ref,
    page: Ref,
    contents: Ref,
    proc_set: Ref,
    shading: Ref,
    function: Ref,
    info: Ref,
    step_function: Option<Ref>,
    pattern: Ref,
}

impl Layout {
    fn new(config: &Config) -> Self {
        let mut alloc = RefAllocator::new();
        Self {
            catalog: alloc.alloc(),
            outlines: alloc.alloc(),
            pages: alloc.alloc(),
            page: alloc.alloc(),
            contents: alloc.alloc(),
            proc_set: alloc.alloc(),
            shading: alloc.alloc(),
            function: alloc.alloc(),
            info: alloc.alloc(),
            step_function: config.legacy_step_function.then(|| alloc.alloc()),
            pattern: alloc.alloc(),
        }
    }
}

/// Escapes `\`, `(` and `)` for a literal string.
pub fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// PDF date string in UTC, e.g. `D:20231105143000+00'00`.
pub fn pdf_date(now: DateTime<Utc>) -> String {
    format!("D:{}+00'00", now.format("%Y%m%d%H%M%S"))
}

fn num(value: f64) -> String {
    function::number(value)
}

pub fn render(config: &Config, now: DateTime<Utc>) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    if config.palette == PaletteMode::Colour && config.depth > MAX_BANDED_DEPTH {
        log::warn!(
            "Depth {} exceeds the {MAX_BANDED_DEPTH} levels the colour table covers; colours will repeat",
            config.depth
        );
    }

    let ids = Layout::new(config);
    let nl = config.newline;
    let mut doc = DocumentBuilder::new(nl, PDF_VERSION);

    doc.add_object(
        ids.catalog,
        &[
            "<< /Type /Catalog".to_string(),
            format!("/Outlines {}", ids.outlines.r()),
            format!("/Pages {}", ids.pages.r()),
            ">>".to_string(),
        ],
    );
    doc.add_object(ids.outlines, &["<< /Type /Outlines", "/Count 0", ">>"]);
    doc.add_object(
        ids.pages,
        &[
            "<< /Type /Pages".to_string(),
            format!("/Kids [{}]", ids.page.r()),
            "/Count 1".to_string(),
            ">>".to_string(),
        ],
    );

    let page_box = format!("[0 0 {} {}]", num(PAGE_WIDTH), num(PAGE_HEIGHT));
    doc.add_object(
        ids.page,
        &[
            "<< /Type /Page".to_string(),
            format!("/Parent {}", ids.pages.r()),
            format!("/MediaBox {page_box}"),
            format!("/CropBox {page_box}"),
            "/Rotate 0".to_string(),
            format!("/Contents {}", ids.contents.r()),
            format!("/Resources << /ProcSet {}", ids.proc_set.r()),
            format!("  /Pattern << /P1 {} >>", ids.pattern.r()),
            "  >>".to_string(),
            ">>".to_string(),
        ],
    );

    // Translate to the page centre, then fill a rectangle covering the page
    // with the shading pattern.
    let (cx, cy) = ((PAGE_WIDTH / 2.0).floor(), (PAGE_HEIGHT / 2.0).floor());
    let content = vec![
        "q".to_string(),
        "/Pattern cs".to_string(),
        "/P1 scn".to_string(),
        format!("1 0 0 1 {} {} cm", num(cx), num(cy)),
        "-500 -350 999 700 re".to_string(),
        "f".to_string(),
        "Q".to_string(),
    ];
    doc.add_object(ids.contents, &stream_object(&["<<".to_string()], &content, nl));

    doc.add_object(ids.proc_set, &["[/PDF]"]);

    doc.add_object(
        ids.shading,
        &[
            "<< /ShadingType 1".to_string(),
            "/ColorSpace /DeviceRGB".to_string(),
            "/Domain [-2 2 -1 1]".to_string(),
            format!("/Function {}", ids.function.r()),
            ">>".to_string(),
        ],
    );

    let program = escape_function(config);
    let function_dict = [
        "<< /FunctionType 4".to_string(),
        "/Domain [-1000 1000 -500 500]".to_string(),
        "/Range [0 1 0 1 0 1]".to_string(),
    ];
    doc.add_object(ids.function, &stream_object(&function_dict, &program, nl));

    let date = pdf_date(now);
    doc.add_object(
        ids.info,
        &[
            format!("<< /Title ({})", escape_pdf_string(&config.title)),
            format!("/Author ({})", escape_pdf_string(&config.author)),
            "/Subject (Fractal)".to_string(),
            format!("/Creator ({CREATOR})"),
            format!("/ModDate ({date})"),
            format!("/CreationDate ({date})"),
            ">>".to_string(),
        ],
    );

    if let Some(step) = ids.step_function {
        let bounds = "[-500 500 -500 500 -500 500 -500 500]";
        let step_dict = [
            "<< /FunctionType 4".to_string(),
            format!("/Domain {bounds}"),
            format!("/Range {bounds}"),
        ];
        doc.add_object(step, &stream_object(&step_dict, &step_function(), nl));
    }

    doc.add_object(
        ids.pattern,
        &[
            "<< /Type /Pattern".to_string(),
            "/PatternType 2".to_string(),
            format!("/Shading {}", ids.shading.r()),
            format!("/Matrix [255 0 0 250 {} {}]", num(cx), num(cy)),
            ">>".to_string(),
        ],
    );

    let objects = doc.object_offsets().len();
    let bytes = doc.finish(&[
        format!("/Root {}", ids.catalog.r()),
        format!("/Info {}", ids.info.r()),
    ]);

    log::info!(
        "Rendered {objects} objects, depth {} ({}), in {:.1}ms",
        config.depth,
        config.palette.label(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    bytes
}

// External Dependencies ------------------------------------------------------
use bitmap::{max_width_px, runtime_width_px, SCALE_BASE};
use image::DynamicImage;


// Internal Dependencies ------------------------------------------------------
use super::cache::SearchCache;
use super::rasterizer::{RenderSpec, TextRasterizer};
use super::search::{fit_dpi, fit_width};
use super::RenderError;


// Rendered Text Image --------------------------------------------------------
/// The finished intermediate image for one (locale, asset) pair, together
/// with the parameters the searches settled on.
pub struct TextImage {
    pub image: DynamicImage,
    pub dpi: u32,
    pub width_param: Option<u32>,
    pub line_count: u8
}


// Text Rendering Orchestration ------------------------------------------------
/// Renders one text asset at the largest DPI fitting the style height and,
/// when a max width is configured, at the largest width parameter fitting
/// the width budget. Reports the effective parameters and the number of
/// wrapped lines so they can be embedded into the output bitmap.
pub fn render_text(
    rasterizer: &dyn TextRasterizer,
    spec: &RenderSpec,
    style_height: u32,
    max_width: Option<u32>,
    canvas_px: u32,
    dpi_ceiling: u32,
    cache: &mut SearchCache

) -> Result<TextImage, RenderError> {

    let budget_height = (u64::from(canvas_px) * u64::from(style_height) / u64::from(SCALE_BASE)) as u32;

    // Seed fast path: accept a cached DPI when it still fits and the next
    // step up would not, otherwise fall back to the full bisection.
    let mut dpi = None;
    if let Some(seed) = cache.seed_dpi(style_height) {
        if seed >= 1 && seed <= dpi_ceiling {
            let height = rasterizer.render(spec, seed, None)?.height;
            if height <= budget_height
                && (seed == dpi_ceiling
                    || rasterizer.render(spec, seed + 1, None)?.height > budget_height)
            {
                dpi = Some(seed);
            }
        }
    }
    let dpi = match dpi {
        Some(dpi) => dpi,
        None => fit_dpi(budget_height, dpi_ceiling, |dpi| {
            Ok(rasterizer.render(spec, dpi, None)?.height)
        })?
    };

    // One-line reference render used to infer the wrapped line count
    let one_line = rasterizer.render(spec, dpi, None)?;

    let result = if let Some(max_width) = max_width {
        let budget_width = max_width_px(max_width, canvas_px);
        let seed = cache.seed_width(style_height, max_width).unwrap_or(max_width);

        let param = fit_width(budget_width, seed, |width| {
            let rendered = rasterizer.render(spec, dpi, Some(width))?;
            let lines = line_count(rendered.height, one_line.height);
            Ok(runtime_width_px(
                (rendered.width, rendered.height),
                style_height,
                lines,
                canvas_px
            ))
        })?;

        let rendered = rasterizer.render(spec, dpi, Some(param))?;
        let lines = line_count(rendered.height, one_line.height);
        cache.record_width(style_height, max_width, param);

        TextImage {
            image: rendered.image,
            dpi,
            width_param: Some(param),
            line_count: lines
        }

    } else {
        TextImage {
            image: one_line.image,
            dpi,
            width_param: None,
            line_count: 1
        }
    };

    cache.record_dpi(style_height, dpi);
    Ok(result)
}

/// Infers the wrapped line count by comparing a render against the one-line
/// reference of the same DPI.
fn line_count(multi_height: u32, one_line_height: u32) -> u8 {
    if one_line_height == 0 {
        return 1;
    }
    let rounded = (2 * multi_height + one_line_height) / (2 * one_line_height);
    rounded.clamp(1, 255) as u8
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use image::DynamicImage;

    use super::super::cache::SearchCache;
    use super::super::rasterizer::{RenderSpec, RenderedText, TextRasterizer};
    use super::super::RenderError;
    use super::{line_count, render_text};

    /// Synthetic layout model: character cells scale linearly with DPI and
    /// a width parameter wraps the text into full lines.
    struct StubRasterizer {
        min_height: u32
    }

    impl StubRasterizer {
        fn geometry(&self, spec: &RenderSpec, dpi: u32, width: Option<u32>) -> (u32, u32) {
            let char_width = dpi / 10 + 1;
            let line_height = (dpi / 2).max(self.min_height);
            let chars = spec.text.chars().count() as u32;
            match width {
                None => (chars * char_width, line_height),
                Some(width) => {
                    let per_line = (width / char_width).max(1);
                    let lines = (chars + per_line - 1) / per_line;
                    (chars.min(per_line) * char_width, lines * line_height)
                }
            }
        }
    }

    impl TextRasterizer for StubRasterizer {
        fn render(&self, spec: &RenderSpec, dpi: u32, width: Option<u32>) -> Result<RenderedText, RenderError> {
            let (w, h) = self.geometry(spec, dpi, width);
            Ok(RenderedText {
                image: DynamicImage::new_rgb8(w.max(1), h.max(1)),
                width: w,
                height: h
            })
        }
    }

    fn spec(text: &str) -> RenderSpec {
        RenderSpec {
            text,
            locale: "en",
            font: None,
            point_size: None,
            foreground: [0, 0, 0],
            background: [255, 255, 255]
        }
    }

    #[test]
    fn test_one_line_uses_largest_fitting_dpi() {
        let rasterizer = StubRasterizer { min_height: 8 };
        let mut cache = SearchCache::new();
        let spec = spec("hello");
        let text = render_text(&rasterizer, &spec, 100, None, 1000, 170, &mut cache).unwrap();
        // line height dpi/2 stays below the 100px budget up to the ceiling
        assert_eq!(text.dpi, 170);
        assert_eq!(text.line_count, 1);
        assert_eq!(text.width_param, None);
    }

    #[test]
    fn test_dpi_bisected_down_to_budget() {
        let rasterizer = StubRasterizer { min_height: 8 };
        let mut cache = SearchCache::new();
        let spec = spec("hello");
        let text = render_text(&rasterizer, &spec, 36, None, 1000, 170, &mut cache).unwrap();
        // budget 36px, line height = dpi/2 -> largest fitting dpi is 73
        assert_eq!(text.dpi, 73);
    }

    #[test]
    fn test_height_floor_minimizes_overshoot() {
        let rasterizer = StubRasterizer { min_height: 30 };
        let mut cache = SearchCache::new();
        let spec = spec("x");
        let text = render_text(&rasterizer, &spec, 20, None, 1000, 170, &mut cache).unwrap();
        // 20px is unreachable; the floor height 30 holds up to dpi 61
        assert_eq!(text.dpi, 61);
    }

    #[test]
    fn test_width_search_wraps_lines() {
        let rasterizer = StubRasterizer { min_height: 8 };
        let mut cache = SearchCache::new();
        let long = "a".repeat(40);
        let spec = spec(&long);
        let text = render_text(&rasterizer, &spec, 100, Some(300), 1000, 170, &mut cache).unwrap();
        assert!(text.line_count > 1);
        assert!(text.width_param.is_some());

        // The emitted image honors the runtime width budget
        let runtime = bitmap::runtime_width_px(
            (text.image.width(), text.image.height()),
            100,
            text.line_count,
            1000
        );
        assert!(runtime <= bitmap::max_width_px(300, 1000));
    }

    #[test]
    fn test_cache_seeds_and_records() {
        let rasterizer = StubRasterizer { min_height: 8 };
        let mut cache = SearchCache::new();
        let spec = spec("hello");
        let first = render_text(&rasterizer, &spec, 36, None, 1000, 170, &mut cache).unwrap();
        assert_eq!(cache.seed_dpi(36), Some(first.dpi));

        // A seeded second run settles on the same result
        let second = render_text(&rasterizer, &spec, 36, None, 1000, 170, &mut cache).unwrap();
        assert_eq!(second.dpi, first.dpi);
    }

    #[test]
    fn test_line_count_rounding() {
        assert_eq!(line_count(22, 22), 1);
        assert_eq!(line_count(44, 22), 2);
        assert_eq!(line_count(43, 22), 2);
        assert_eq!(line_count(56, 22), 3);
        assert_eq!(line_count(10, 0), 1);
        assert_eq!(line_count(22 * 300, 22), 255);
    }
}

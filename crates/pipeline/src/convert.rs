// STD Dependencies -----------------------------------------------------------
use std::path::Path;


// External Dependencies ------------------------------------------------------
use bitmap::{convert_image, text_color_budget, Geometry, Scale};
use board::FormatConfig;
use render::{render_text, RenderError, RenderSpec, SearchCache, SvgConverter, TextRasterizer};


// Internal Dependencies ------------------------------------------------------
use crate::error::BuildError;


// Constants ------------------------------------------------------------------
/// Sprites and icons keep far more shades than anti-aliased body text
const SPRITE_MAX_COLORS: usize = 128;


// Shared Conversion Parameters -----------------------------------------------
/// The read-only parameters shared by every conversion of one board.
#[derive(Clone, Copy)]
pub struct ConvertContext<'a> {
    pub format: &'a FormatConfig,
    pub geometry: &'a Geometry,
    pub text_colors: u32,
    pub dpi_ceiling: u32,
    pub point_size: Option<u32>
}


// Text Asset Conversion ------------------------------------------------------
/// Renders one text asset for a locale and converts it into the final
/// bitmap bytes. When `scaled` is false the rendered image is quantized at
/// its natural size; the runtime renderer scales it up instead, which
/// keeps low resolution locales small.
pub fn convert_text(
    rasterizer: &dyn TextRasterizer,
    context: &ConvertContext,
    locale: &str,
    category: &str,
    text: &str,
    scaled: bool,
    cache: &mut SearchCache

) -> Result<Vec<u8>, BuildError> {

    let style = context.format.resolve_style(category)?;
    let spec = RenderSpec {
        text,
        locale,
        font: context.format.font(locale),
        point_size: context.point_size,
        foreground: style.foreground,
        background: style.background
    };

    let rendered = render_text(
        rasterizer,
        &spec,
        style.height,
        style.max_width,
        context.geometry.canvas_px(),
        context.dpi_ceiling,
        cache
    )?;

    let scale = if scaled {
        Some(Scale {
            x: 0,
            y: style.height * u32::from(rendered.line_count)
        })

    } else {
        None
    };

    let colors = text_color_budget(rendered.dpi, context.text_colors);
    let bytes = convert_image(
        rendered.image,
        scale,
        context.geometry,
        style.background,
        colors as usize,
        rendered.line_count
    )?;
    Ok(bytes)
}


// Sprite / Icon Conversion ---------------------------------------------------
/// Converts one sprite source image (PNG or SVG) into the final bitmap
/// bytes at its configured style height.
pub fn convert_sprite(
    svg: Option<&SvgConverter>,
    context: &ConvertContext,
    category: &str,
    source: &Path

) -> Result<Vec<u8>, BuildError> {

    let style = context.format.resolve_style(category)?;
    let image = if source.extension().map_or(false, |ext| ext == "svg") {
        let svg = svg.ok_or_else(|| {
            BuildError::Render(RenderError::Image(format!(
                "{}: no SVG converter configured", source.display()
            )))
        })?;
        svg.convert(source, style.background, context.dpi_ceiling)?

    } else {
        image::open(source).map_err(|err| {
            RenderError::Image(format!("{}: {}", source.display(), err))
        })?
    };

    let bytes = convert_image(
        image,
        Some(Scale {
            x: 0,
            y: style.height
        }),
        context.geometry,
        style.background,
        SPRITE_MAX_COLORS,
        1
    )?;
    Ok(bytes)
}

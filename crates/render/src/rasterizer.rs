// STD Dependencies -----------------------------------------------------------
use std::path::{Path, PathBuf};


// External Dependencies ------------------------------------------------------
use file_io::{run_command, write_text_file, FileError};
use image::DynamicImage;
use tempfile::TempDir;


// Internal Dependencies ------------------------------------------------------
use super::RenderError;


// Render Request -------------------------------------------------------------
/// Style parameters for one text rendering, independent of the DPI and
/// width parameters varied by the searches.
#[derive(Debug, Clone, Copy)]
pub struct RenderSpec<'a> {
    pub text: &'a str,
    pub locale: &'a str,
    pub font: Option<&'a str>,
    pub point_size: Option<u32>,
    pub foreground: [u8; 3],
    pub background: [u8; 3]
}

/// One rasterized text image together with its measured pixel size.
#[derive(Clone)]
pub struct RenderedText {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32
}


// Rasterizer Abstraction -----------------------------------------------------
/// A text layout rasterizer. The production implementation shells out to
/// the external layout tool; tests drive the searches with synthetic
/// implementations instead.
pub trait TextRasterizer {
    fn render(&self, spec: &RenderSpec, dpi: u32, width: Option<u32>) -> Result<RenderedText, RenderError>;
}


// External Text Layout Tool --------------------------------------------------
/// Invokes the pango based text-to-PNG tool as a subprocess. Each call
/// renders into a fresh scratch directory below one per-rasterizer temp
/// directory, so parallel workers never collide.
pub struct PangoRasterizer {
    program: PathBuf,
    work_dir: TempDir
}

impl PangoRasterizer {

    pub fn new(program: PathBuf) -> Result<Self, RenderError> {
        let work_dir = TempDir::new().map_err(|io| {
            FileError::new(io, std::env::temp_dir())
        })?;
        Ok(Self {
            program,
            work_dir
        })
    }

}

fn command_args(spec: &RenderSpec, dpi: u32, width: Option<u32>, outdir: &Path, input: &Path) -> Vec<String> {
    let mut args = vec![
        format!("--lan={}", spec.locale),
        format!("--outdir={}", outdir.display()),
        format!("--dpi={}", dpi),
        format!(
            "--color=#{:02x}{:02x}{:02x}",
            spec.foreground[0], spec.foreground[1], spec.foreground[2]
        ),
        format!(
            "--bgcolor=#{:02x}{:02x}{:02x}",
            spec.background[0], spec.background[1], spec.background[2]
        ),
        "--margin=0 0".to_string()
    ];
    if let Some(font) = spec.font {
        args.push(format!("--font={}", font));
    }
    if let Some(point) = spec.point_size {
        args.push(format!("--point={}", point));
    }
    if let Some(width) = width {
        args.push(format!("--width={}", width));
    }
    args.push(input.display().to_string());
    args
}

impl TextRasterizer for PangoRasterizer {

    fn render(&self, spec: &RenderSpec, dpi: u32, width: Option<u32>) -> Result<RenderedText, RenderError> {
        let scratch = TempDir::new_in(self.work_dir.path()).map_err(|io| {
            FileError::new(io, self.work_dir.path().to_path_buf())
        })?;
        let input = scratch.path().join("text.txt");
        write_text_file(&input, spec.text)?;

        let args = command_args(spec, dpi, width, scratch.path(), &input);
        run_command(&self.program.display().to_string(), &args, Some(&input))?;

        let output = scratch.path().join("text.png");
        let image = image::open(&output).map_err(|err| {
            RenderError::Image(format!("{}: {}", output.display(), err))
        })?;
        Ok(RenderedText {
            width: image.width(),
            height: image.height(),
            image
        })
    }

}


// External SVG Converter -----------------------------------------------------
/// Rasterizes an SVG source through the external converter with an explicit
/// background color and DPI.
pub struct SvgConverter {
    program: PathBuf
}

impl SvgConverter {

    pub fn new(program: PathBuf) -> Self {
        Self {
            program
        }
    }

    pub fn convert(&self, input: &Path, background: [u8; 3], dpi: u32) -> Result<DynamicImage, RenderError> {
        let scratch = TempDir::new().map_err(|io| {
            FileError::new(io, std::env::temp_dir())
        })?;
        let output = scratch.path().join("image.png");

        let args = vec![
            format!(
                "--background-color=#{:02x}{:02x}{:02x}",
                background[0], background[1], background[2]
            ),
            format!("--dpi-x={}", dpi),
            format!("--dpi-y={}", dpi),
            format!("--output={}", output.display()),
            input.display().to_string()
        ];
        run_command(&self.program.display().to_string(), &args, Some(input))?;

        image::open(&output).map_err(|err| {
            RenderError::Image(format!("{}: {}", output.display(), err))
        })
    }

}

// STD Dependencies -----------------------------------------------------------
use std::fmt;


// External Dependencies ------------------------------------------------------
use image::DynamicImage;
use image::imageops::{self, FilterType};


// Modules --------------------------------------------------------------------
pub mod bmp;
mod flatten;
mod quantize;
mod scale;

pub use self::flatten::flatten;
pub use self::quantize::{quantize, text_color_budget, Indexed};
pub use self::scale::{max_width_px, runtime_width_px, Geometry, Scale, SCALE_BASE};


// Bitmap Error Abstraction ---------------------------------------------------
#[derive(Debug)]
pub enum BitmapError {
    UnsupportedFormat(String),
    InvalidScale(u32, u32),
    ZeroDimension {
        scale: (u32, u32),
        size: (u32, u32)
    },
    StretchedPanel {
        screen: (u32, u32),
        panel: (u32, u32)
    },
    MalformedBitmap(String)
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BitmapError::UnsupportedFormat(mode) => {
                write!(f, "Unsupported source pixel format \"{}\"", mode)
            },
            BitmapError::InvalidScale(x, y) => {
                write!(f, "Invalid scale parameter ({}, {}): at least one axis must be set", x, y)
            },
            BitmapError::ZeroDimension { scale, size } => {
                write!(
                    f,
                    "Width or height is 0 after scaling: scale=({}, {}) size=({}, {})",
                    scale.0, scale.1, size.0, size.1
                )
            },
            BitmapError::StretchedPanel { screen, panel } => {
                write!(
                    f,
                    "Panel aspect ratio ({}x{}) is smaller than screen aspect ratio ({}x{}). \
                    The screen would be shrunk horizontally, which is unsupported.",
                    panel.0, panel.1, screen.0, screen.1
                )
            },
            BitmapError::MalformedBitmap(msg) => {
                write!(f, "Malformed bitmap: {}", msg)
            }
        }
    }
}


// Image Conversion Entry Point -----------------------------------------------
/// Converts a decoded source image into the final quantized bitmap bytes.
///
/// The source is flattened onto `background`, scaled according to `scale`
/// (when set) with the panel stretch correction of `geometry` applied,
/// quantized to at most `max_colors` palette entries and encoded as an 8-bit
/// paletted BMP with `line_count` embedded in the reserved header byte.
pub fn convert_image(
    source: DynamicImage,
    scale: Option<Scale>,
    geometry: &Geometry,
    background: [u8; 3],
    max_colors: usize,
    line_count: u8

) -> Result<Vec<u8>, BitmapError> {

    let source_size = (source.width(), source.height());
    let flat = flatten(source, background)?;

    let flat = if let Some(scale) = scale {
        let size = geometry.calculate_dimension(source_size, scale)?;
        if size != source_size {
            imageops::resize(&flat, size.0, size.1, FilterType::CatmullRom)

        } else {
            flat
        }

    } else {
        flat
    };

    let indexed = quantize(&flat, max_colors);
    let mut bytes = bmp::encode(&indexed);
    bmp::patch_line_count(&mut bytes, line_count);
    Ok(bytes)
}

// STD Dependencies -----------------------------------------------------------
use std::fmt;


// External Dependencies ------------------------------------------------------
use file_io::{CommandError, FileError};


// Modules --------------------------------------------------------------------
mod cache;
mod rasterizer;
mod search;
mod text;

pub use self::cache::SearchCache;
pub use self::rasterizer::{PangoRasterizer, RenderSpec, RenderedText, SvgConverter, TextRasterizer};
pub use self::search::{fit_dpi, fit_width};
pub use self::text::{render_text, TextImage};


// Render Error Abstraction ---------------------------------------------------
#[derive(Debug)]
pub enum RenderError {
    Command(CommandError),
    File(FileError),
    Image(String)
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RenderError::Command(err) => err.fmt(f),
            RenderError::File(err) => err.fmt(f),
            RenderError::Image(msg) => write!(f, "Failed to load rendered image: {}", msg)
        }
    }
}

impl From<CommandError> for RenderError {
    fn from(err: CommandError) -> Self {
        RenderError::Command(err)
    }
}

impl From<FileError> for RenderError {
    fn from(err: FileError) -> Self {
        RenderError::File(err)
    }
}

// STD Dependencies -----------------------------------------------------------
use std::fmt;
use std::path::PathBuf;


// External Dependencies ------------------------------------------------------
use bitmap::BitmapError;
use board::ConfigError;
use file_io::{CommandError, FileError};
use render::RenderError;


// Build Error Abstraction ----------------------------------------------------
/// Top level failure of a board build. Everything below the batch layer
/// reports its own error type; this enum carries them to `main` unchanged.
#[derive(Debug)]
pub enum BuildError {
    Config(ConfigError),
    Render(RenderError),
    Bitmap(BitmapError),
    File(FileError),
    Command(CommandError),
    UnknownBoard(String),
    Translations {
        locale: String,
        message: String
    },
    MissingEnglishBitmap {
        locale: String,
        name: String
    },
    Validation {
        file: PathBuf,
        width: u32,
        budget: u32
    },
    Parallel(String),
    Aborted
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::Config(err) => err.fmt(f),
            BuildError::Render(err) => err.fmt(f),
            BuildError::Bitmap(err) => err.fmt(f),
            BuildError::File(err) => err.fmt(f),
            BuildError::Command(err) => err.fmt(f),
            BuildError::UnknownBoard(board) => {
                write!(f, "Board \"{}\" is not present in the boards configuration", board)
            },
            BuildError::Translations { locale, message } => {
                write!(f, "Failed to load translations for locale \"{}\": {}", locale, message)
            },
            BuildError::MissingEnglishBitmap { locale, name } => {
                write!(
                    f,
                    "Locale \"{}\" has no translation for \"{}\" and no English bitmap exists to copy",
                    locale, name
                )
            },
            BuildError::Validation { file, width, budget } => {
                write!(
                    f,
                    "Bitmap \"{}\" renders {}px wide at runtime, exceeding its budget of {}px",
                    file.display(), width, budget
                )
            },
            BuildError::Parallel(msg) => {
                write!(f, "Failed to start the worker pool: {}", msg)
            },
            BuildError::Aborted => write!(f, "Aborted by user")
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        BuildError::Config(err)
    }
}

impl From<RenderError> for BuildError {
    fn from(err: RenderError) -> Self {
        BuildError::Render(err)
    }
}

impl From<BitmapError> for BuildError {
    fn from(err: BitmapError) -> Self {
        BuildError::Bitmap(err)
    }
}

impl From<FileError> for BuildError {
    fn from(err: FileError) -> Self {
        BuildError::File(err)
    }
}

impl From<CommandError> for BuildError {
    fn from(err: CommandError) -> Self {
        BuildError::Command(err)
    }
}

// Modules --------------------------------------------------------------------
mod batch;
mod convert;
mod error;
mod output;
mod strings;
mod validate;

pub use self::batch::{build_board, BuildOptions, CancelToken};
pub use self::convert::{convert_sprite, convert_text, ConvertContext};
pub use self::error::BuildError;
pub use self::output::OutputLayout;
pub use self::strings::{normalize, FallbackPolicy, LocaleStrings};
pub use self::validate::validate_board;

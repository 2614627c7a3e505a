// Modules --------------------------------------------------------------------
mod config;
mod error;
mod features;
mod format;
mod locale;

pub use self::config::{load_boards_config, BoardConfig, PhysicalPresence};
pub use self::error::ConfigError;
pub use self::features::{FeatureFlags, RenameMap, Resolution};
pub use self::format::{parse_color, FormatConfig, Style};
pub use self::locale::{resolve_locales, LocaleInfo};

// STD Dependencies -----------------------------------------------------------
use std::fmt;


// Configuration Error Abstraction --------------------------------------------
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    MissingDefault,
    UnknownBoard(String),
    MissingField {
        board: String,
        field: &'static str
    },
    InvalidPhysicalPresence {
        board: String,
        value: String
    },
    InvalidColor(String),
    UnknownStyleCategory(String),
    MissingStyleField {
        category: String,
        field: &'static str
    },
    DuplicateRenameTarget(String),
    LocaleNotListed {
        set: &'static str,
        locale: String
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => {
                write!(f, "Failed to parse configuration file: {}", msg)
            },
            ConfigError::MissingDefault => {
                write!(f, "Default configuration \"_DEFAULT_\" is not found")
            },
            ConfigError::UnknownBoard(board) => {
                write!(f, "Board \"{}\" not found in board configuration", board)
            },
            ConfigError::MissingField { board, field } => {
                write!(f, "Board \"{}\" is missing required field \"{}\"", board, field)
            },
            ConfigError::InvalidPhysicalPresence { board, value } => {
                write!(f, "Invalid physical presence setting \"{}\" for board \"{}\"", value, board)
            },
            ConfigError::InvalidColor(value) => {
                write!(f, "Color \"{}\" must be a 24-bit hex value e.g. 808080", value)
            },
            ConfigError::UnknownStyleCategory(category) => {
                write!(f, "Style category \"{}\" referenced by the asset manifest does not exist", category)
            },
            ConfigError::MissingStyleField { category, field } => {
                write!(f, "Style category \"{}\" is missing field \"{}\" and no default supplies it", category, field)
            },
            ConfigError::DuplicateRenameTarget(target) => {
                write!(f, "Multiple rename entries map onto target \"{}\"", target)
            },
            ConfigError::LocaleNotListed { set, locale } => {
                write!(f, "Locale \"{}\" in the {} set is not part of the board locale list", locale, set)
            }
        }
    }
}

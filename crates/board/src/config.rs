// STD Dependencies -----------------------------------------------------------
use std::collections::{BTreeMap, HashSet};
use std::fmt;


// External Dependencies ------------------------------------------------------
use serde::Deserialize;


// Internal Dependencies ------------------------------------------------------
use crate::error::ConfigError;


// Constants ------------------------------------------------------------------
const DEFAULT_NAME: &str = "_DEFAULT_";


// Physical Presence Mode -----------------------------------------------------
/// How the user proves physical presence when enabling developer mode.
/// Exactly one of three message variants is selected by this mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalPresence {
    Keyboard,
    Power,
    Recovery
}

impl PhysicalPresence {
    fn parse(value: &str, board: &str) -> Result<Self, ConfigError> {
        match value {
            "keyboard" => Ok(PhysicalPresence::Keyboard),
            "power" => Ok(PhysicalPresence::Power),
            "recovery" => Ok(PhysicalPresence::Recovery),
            _ => Err(ConfigError::InvalidPhysicalPresence {
                board: board.to_string(),
                value: value.to_string()
            })
        }
    }
}

impl fmt::Display for PhysicalPresence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhysicalPresence::Keyboard => write!(f, "keyboard"),
            PhysicalPresence::Power => write!(f, "power"),
            PhysicalPresence::Recovery => write!(f, "recovery")
        }
    }
}


// Board Configuration --------------------------------------------------------
/// Resolved configuration for a single board. Loaded once per build and
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub name: String,
    pub screen: (u32, u32),
    pub panel: Option<(u32, u32)>,
    pub sdcard: bool,
    pub bad_usb3: bool,
    pub physical_presence: PhysicalPresence,
    pub dpi: u32,
    pub locales: Vec<String>,
    pub rtl: HashSet<String>,
    pub hi_res: HashSet<String>,
    pub text_colors: u32,
    pub rw_overrides: Vec<String>
}

/// One entry of the raw configuration file. Boards are keyed by
/// comma-separated name lists and every field is a partial override of the
/// `_DEFAULT_` entry.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBoard {
    screen: Option<[u32; 2]>,
    panel: Option<[u32; 2]>,
    sdcard: Option<bool>,
    bad_usb3: Option<bool>,
    physical_presence: Option<String>,
    dpi: Option<u32>,
    locales: Option<Vec<String>>,
    rtl: Option<Vec<String>>,
    hi_res: Option<Vec<String>>,
    text_colors: Option<u32>,
    rw_overrides: Option<Vec<String>>
}

impl RawBoard {
    fn merge_over(&self, default: &RawBoard) -> RawBoard {
        RawBoard {
            screen: self.screen.or(default.screen),
            panel: self.panel.or(default.panel),
            sdcard: self.sdcard.or(default.sdcard),
            bad_usb3: self.bad_usb3.or(default.bad_usb3),
            physical_presence: self.physical_presence.clone().or_else(|| default.physical_presence.clone()),
            dpi: self.dpi.or(default.dpi),
            locales: self.locales.clone().or_else(|| default.locales.clone()),
            rtl: self.rtl.clone().or_else(|| default.rtl.clone()),
            hi_res: self.hi_res.clone().or_else(|| default.hi_res.clone()),
            text_colors: self.text_colors.or(default.text_colors),
            rw_overrides: self.rw_overrides.clone().or_else(|| default.rw_overrides.clone())
        }
    }

    fn resolve(self, board: &str) -> Result<BoardConfig, ConfigError> {
        let missing = |field| ConfigError::MissingField {
            board: board.to_string(),
            field
        };
        let screen = self.screen.ok_or_else(|| missing("screen"))?;
        let locales = self.locales.ok_or_else(|| missing("locales"))?;
        let presence = match self.physical_presence.as_deref() {
            Some(value) => PhysicalPresence::parse(value, board)?,
            None => PhysicalPresence::Keyboard
        };

        let config = BoardConfig {
            name: board.to_string(),
            screen: (screen[0], screen[1]),
            panel: self.panel.map(|panel| (panel[0], panel[1])),
            sdcard: self.sdcard.unwrap_or(true),
            bad_usb3: self.bad_usb3.unwrap_or(false),
            physical_presence: presence,
            dpi: self.dpi.unwrap_or(170),
            rtl: self.rtl.unwrap_or_default().into_iter().collect(),
            hi_res: self.hi_res.unwrap_or_default().into_iter().collect(),
            text_colors: self.text_colors.unwrap_or(3),
            rw_overrides: self.rw_overrides.unwrap_or_default(),
            locales
        };

        // RTL / hi-res sets must be subsets of the configured locale list
        let listed: HashSet<&str> = config.locales.iter().map(String::as_str).collect();
        for locale in &config.rtl {
            if !listed.contains(locale.as_str()) {
                return Err(ConfigError::LocaleNotListed {
                    set: "rtl",
                    locale: locale.clone()
                });
            }
        }
        for locale in &config.hi_res {
            if !listed.contains(locale.as_str()) {
                return Err(ConfigError::LocaleNotListed {
                    set: "hi_res",
                    locale: locale.clone()
                });
            }
        }
        Ok(config)
    }
}

/// Loads the configuration of all boards from a TOML string. Each entry is
/// deep-merged over the `_DEFAULT_` entry and comma-separated keys define
/// multiple boards sharing one configuration.
pub fn load_boards_config(text: &str) -> Result<BTreeMap<String, BoardConfig>, ConfigError> {
    let raw: BTreeMap<String, RawBoard> = toml::from_str(text).map_err(|err| {
        ConfigError::Parse(err.to_string())
    })?;

    let default = raw.get(DEFAULT_NAME).ok_or(ConfigError::MissingDefault)?.clone();

    let mut configs = BTreeMap::new();
    for (names, params) in &raw {
        if names == DEFAULT_NAME {
            continue;
        }
        let merged = params.merge_over(&default);
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            configs.insert(name.to_string(), merged.clone().resolve(name)?);
        }
    }
    Ok(configs)
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use super::{load_boards_config, ConfigError, PhysicalPresence};

    const CONFIG: &str = r#"
        [_DEFAULT_]
        screen = [1366, 768]
        dpi = 170
        text_colors = 3
        locales = ["en", "de", "ar"]
        rtl = ["ar"]
        hi_res = ["en", "de"]

        [eve]
        screen = [2400, 1600]
        text_colors = 5

        ["link, samus"]
        sdcard = false
        physical_presence = "recovery"
    "#;

    #[test]
    fn test_default_inheritance() {
        let configs = load_boards_config(CONFIG).unwrap();
        let eve = &configs["eve"];
        assert_eq!(eve.screen, (2400, 1600));
        assert_eq!(eve.text_colors, 5);
        assert_eq!(eve.dpi, 170);
        assert_eq!(eve.locales, vec!["en", "de", "ar"]);
        assert!(eve.sdcard);
        assert_eq!(eve.physical_presence, PhysicalPresence::Keyboard);
    }

    #[test]
    fn test_comma_separated_board_keys() {
        let configs = load_boards_config(CONFIG).unwrap();
        assert_eq!(configs["link"].screen, (1366, 768));
        assert!(!configs["samus"].sdcard);
        assert_eq!(configs["samus"].physical_presence, PhysicalPresence::Recovery);
    }

    #[test]
    fn test_missing_default_rejected() {
        let result = load_boards_config("[eve]\nscreen = [800, 600]\nlocales = [\"en\"]\n");
        assert_eq!(result.unwrap_err(), ConfigError::MissingDefault);
    }

    #[test]
    fn test_invalid_physical_presence_rejected() {
        let result = load_boards_config(r#"
            [_DEFAULT_]
            screen = [800, 600]
            locales = ["en"]

            [eve]
            physical_presence = "button"
        "#);
        assert_eq!(result.unwrap_err(), ConfigError::InvalidPhysicalPresence {
            board: "eve".to_string(),
            value: "button".to_string()
        });
    }

    #[test]
    fn test_rtl_locale_must_be_listed() {
        let result = load_boards_config(r#"
            [_DEFAULT_]
            screen = [800, 600]
            locales = ["en"]
            rtl = ["he"]

            [eve]
        "#);
        assert_eq!(result.unwrap_err(), ConfigError::LocaleNotListed {
            set: "rtl",
            locale: "he".to_string()
        });
    }
}

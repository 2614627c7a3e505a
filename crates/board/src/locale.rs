// Internal Dependencies ------------------------------------------------------
use crate::config::BoardConfig;
use crate::error::ConfigError;


// Locale Information ---------------------------------------------------------
/// One locale to build for a board, with its rendering properties derived
/// from the board RTL and hi-res sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    pub code: String,
    pub rtl: bool,
    pub hi_res: bool
}

/// Derives the locale list for a board, honoring an optional override list
/// from the build options. The board RTL / hi-res sets are validated against
/// the configured locale list at board load time already; membership of the
/// active list decides the per-locale flags.
pub fn resolve_locales(
    config: &BoardConfig,
    override_list: Option<&[String]>

) -> Result<Vec<LocaleInfo>, ConfigError> {
    let active: Vec<&String> = match override_list {
        Some(list) if !list.is_empty() => list.iter().collect(),
        _ => config.locales.iter().collect()
    };

    Ok(active.into_iter().map(|code| {
        LocaleInfo {
            code: code.clone(),
            rtl: config.rtl.contains(code),
            hi_res: config.hi_res.contains(code)
        }

    }).collect())
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use crate::config::load_boards_config;

    use super::resolve_locales;

    const CONFIG: &str = r#"
        [_DEFAULT_]
        screen = [1366, 768]
        locales = ["en", "ar", "de"]
        rtl = ["ar"]
        hi_res = ["en", "de"]

        [eve]
    "#;

    #[test]
    fn test_flags_derived_from_sets() {
        let configs = load_boards_config(CONFIG).unwrap();
        let locales = resolve_locales(&configs["eve"], None).unwrap();
        assert_eq!(locales.len(), 3);
        assert!(!locales[0].rtl && locales[0].hi_res);
        assert!(locales[1].rtl && !locales[1].hi_res);
        assert_eq!(locales[1].code, "ar");
    }

    #[test]
    fn test_override_list() {
        let configs = load_boards_config(CONFIG).unwrap();
        let over = vec!["ar".to_string()];
        let locales = resolve_locales(&configs["eve"], Some(&over)).unwrap();
        assert_eq!(locales.len(), 1);
        assert!(locales[0].rtl);
    }
}

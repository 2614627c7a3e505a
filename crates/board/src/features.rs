// STD Dependencies -----------------------------------------------------------
use std::collections::{HashMap, HashSet};


// Internal Dependencies ------------------------------------------------------
use crate::config::{BoardConfig, PhysicalPresence};
use crate::error::ConfigError;


// Feature Flags --------------------------------------------------------------
/// Runtime feature selection for one board. Built once from the board
/// configuration plus the build options; the rename map derives from this
/// value alone so no ambient state is consulted during conversion.
#[derive(Debug, Clone, Copy)]
pub struct FeatureFlags {
    pub sdcard: bool,
    pub bad_usb3: bool,
    pub physical_presence: PhysicalPresence,
    pub detachable_ui: bool,
    pub diagnostic_ui: bool
}

impl FeatureFlags {
    pub fn new(config: &BoardConfig, detachable_ui: bool, diagnostic_ui: bool) -> Self {
        Self {
            sdcard: config.sdcard,
            bad_usb3: config.bad_usb3,
            physical_presence: config.physical_presence,
            detachable_ui,
            diagnostic_ui
        }
    }
}


// Rename Resolution ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Emit the asset under its own name with its own content
    Keep,
    /// Emit the asset under its own name but with the content of another
    Replace(&'a str),
    /// Do not emit this asset for this board
    Drop
}


// Rename / Replace Map -------------------------------------------------------
/// For each entry (key, value) the asset `key` is emitted with the content
/// of asset `value`; an empty value drops the asset entirely. Variant
/// sources are dropped by default and swapped in by feature flags.
#[derive(Debug)]
pub struct RenameMap {
    map: HashMap<String, Option<String>>
}

impl RenameMap {

    pub fn build(flags: &FeatureFlags) -> Result<Self, ConfigError> {
        let mut map: HashMap<String, Option<String>> = HashMap::new();

        // Variant sources never appear under their own name
        for variant in [
            "rec_sel_desc1_no_sd",
            "rec_sel_desc1_no_sd_usb2",
            "rec_sel_desc1_usb2",
            "rec_to_dev_desc1_phyrec",
            "rec_to_dev_desc1_power",
            "navigate_tablet",
            "reserve_charging",
            "reserve_charging_empty"
        ] {
            map.insert(variant.to_string(), None);
        }

        // The insertion message depends on both the SD card slot and
        // whether USB3 ports are unusable for recovery
        if !flags.sdcard {
            let variant = if flags.bad_usb3 {
                "rec_sel_desc1_no_sd_usb2"

            } else {
                "rec_sel_desc1_no_sd"
            };
            map.insert("rec_sel_desc1".to_string(), Some(variant.to_string()));

        } else if flags.bad_usb3 {
            map.insert(
                "rec_sel_desc1".to_string(),
                Some("rec_sel_desc1_usb2".to_string())
            );
        }

        match flags.physical_presence {
            PhysicalPresence::Keyboard => (),
            PhysicalPresence::Power => {
                map.insert(
                    "rec_to_dev_desc1".to_string(),
                    Some("rec_to_dev_desc1_power".to_string())
                );
            },
            PhysicalPresence::Recovery => {
                map.insert(
                    "rec_to_dev_desc1".to_string(),
                    Some("rec_to_dev_desc1_phyrec".to_string())
                );
            }
        }

        if flags.detachable_ui {
            map.insert(
                "navigate".to_string(),
                Some("navigate_tablet".to_string())
            );
        }

        Self::from_entries(map)
    }

    /// Builds a map from raw (name, target) entries. Target names must be
    /// pairwise distinct or two assets would be rendered from the same
    /// source while claiming different content.
    fn from_entries(map: HashMap<String, Option<String>>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for target in map.values().flatten() {
            if !seen.insert(target.as_str()) {
                return Err(ConfigError::DuplicateRenameTarget(target.clone()));
            }
        }
        Ok(Self {
            map
        })
    }

    pub fn resolve<'a>(&'a self, name: &str) -> Resolution<'a> {
        match self.map.get(name) {
            None => Resolution::Keep,
            Some(None) => Resolution::Drop,
            Some(Some(target)) => Resolution::Replace(target)
        }
    }

}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use crate::config::PhysicalPresence;

    use super::{FeatureFlags, RenameMap, Resolution};

    fn flags(sdcard: bool, presence: PhysicalPresence) -> FeatureFlags {
        FeatureFlags {
            sdcard,
            bad_usb3: false,
            physical_presence: presence,
            detachable_ui: false,
            diagnostic_ui: false
        }
    }

    #[test]
    fn test_sdcard_variant_selection() {
        let map = RenameMap::build(&flags(false, PhysicalPresence::Keyboard)).unwrap();
        assert_eq!(map.resolve("rec_sel_desc1"), Resolution::Replace("rec_sel_desc1_no_sd"));
        assert_eq!(map.resolve("rec_sel_desc1_no_sd"), Resolution::Drop);

        let map = RenameMap::build(&flags(true, PhysicalPresence::Keyboard)).unwrap();
        assert_eq!(map.resolve("rec_sel_desc1"), Resolution::Keep);
        assert_eq!(map.resolve("rec_sel_desc1_no_sd"), Resolution::Drop);
    }

    #[test]
    fn test_physical_presence_variants() {
        let map = RenameMap::build(&flags(true, PhysicalPresence::Power)).unwrap();
        assert_eq!(map.resolve("rec_to_dev_desc1"), Resolution::Replace("rec_to_dev_desc1_power"));
        assert_eq!(map.resolve("rec_to_dev_desc1_phyrec"), Resolution::Drop);

        let map = RenameMap::build(&flags(true, PhysicalPresence::Recovery)).unwrap();
        assert_eq!(map.resolve("rec_to_dev_desc1"), Resolution::Replace("rec_to_dev_desc1_phyrec"));

        let map = RenameMap::build(&flags(true, PhysicalPresence::Keyboard)).unwrap();
        assert_eq!(map.resolve("rec_to_dev_desc1"), Resolution::Keep);
        assert_eq!(map.resolve("rec_to_dev_desc1_power"), Resolution::Drop);
    }

    #[test]
    fn test_bad_usb3_variant_selection() {
        let mut bad_usb3 = flags(true, PhysicalPresence::Keyboard);
        bad_usb3.bad_usb3 = true;
        let map = RenameMap::build(&bad_usb3).unwrap();
        assert_eq!(map.resolve("rec_sel_desc1"), Resolution::Replace("rec_sel_desc1_usb2"));
        assert_eq!(map.resolve("rec_sel_desc1_usb2"), Resolution::Drop);

        bad_usb3.sdcard = false;
        let map = RenameMap::build(&bad_usb3).unwrap();
        assert_eq!(map.resolve("rec_sel_desc1"), Resolution::Replace("rec_sel_desc1_no_sd_usb2"));

        // Good USB3 ports leave the insertion message untouched
        let map = RenameMap::build(&flags(true, PhysicalPresence::Keyboard)).unwrap();
        assert_eq!(map.resolve("rec_sel_desc1"), Resolution::Keep);
        assert_eq!(map.resolve("rec_sel_desc1_no_sd_usb2"), Resolution::Drop);
    }

    #[test]
    fn test_duplicate_targets_rejected() {
        use std::collections::HashMap;

        use crate::error::ConfigError;

        let mut entries: HashMap<String, Option<String>> = HashMap::new();
        entries.insert("rec_sel_desc1".to_string(), Some("rec_sel_desc1_no_sd".to_string()));
        entries.insert("rec_sel_desc2".to_string(), Some("rec_sel_desc1_no_sd".to_string()));
        assert_eq!(
            RenameMap::from_entries(entries).unwrap_err(),
            ConfigError::DuplicateRenameTarget("rec_sel_desc1_no_sd".to_string())
        );
    }

    #[test]
    fn test_flag_built_maps_have_distinct_targets() {
        // Every flag combination must produce a valid map
        for sdcard in [false, true] {
            for bad_usb3 in [false, true] {
                for presence in [
                    PhysicalPresence::Keyboard,
                    PhysicalPresence::Power,
                    PhysicalPresence::Recovery
                ] {
                    let mut combination = flags(sdcard, presence);
                    combination.bad_usb3 = bad_usb3;
                    combination.detachable_ui = true;
                    assert!(RenameMap::build(&combination).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_detachable_navigation() {
        let mut detachable = flags(true, PhysicalPresence::Keyboard);
        detachable.detachable_ui = true;
        let map = RenameMap::build(&detachable).unwrap();
        assert_eq!(map.resolve("navigate"), Resolution::Replace("navigate_tablet"));

        let map = RenameMap::build(&flags(true, PhysicalPresence::Keyboard)).unwrap();
        assert_eq!(map.resolve("navigate"), Resolution::Keep);
        assert_eq!(map.resolve("navigate_tablet"), Resolution::Drop);
    }

    #[test]
    fn test_unmapped_names_kept() {
        let map = RenameMap::build(&flags(true, PhysicalPresence::Keyboard)).unwrap();
        assert_eq!(map.resolve("language"), Resolution::Keep);
    }
}

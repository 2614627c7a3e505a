// STD Dependencies -----------------------------------------------------------
use std::path::PathBuf;


// External Dependencies ------------------------------------------------------
use board::LocaleInfo;
use file_io::{create_dir, remove_dir, write_text_file, FileError};


// Output Tree Layout ---------------------------------------------------------
/// The directory layout consumed by the downstream archiver:
///
/// ```text
/// <board>/<asset>.bmp
/// <board>/locale/ro/<locale>/<asset>.bmp
/// <board>/rw/locale/ro/<locale>/<asset>.bmp
/// <board>/font/<glyph>.bmp
/// <board>/locales
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    board_dir: PathBuf
}

impl OutputLayout {

    pub fn new(output_root: &std::path::Path, board: &str) -> Self {
        Self {
            board_dir: output_root.join(board)
        }
    }

    /// Removes any previous build of this board and creates the static
    /// part of the tree. Locale directories are created by the workers.
    pub fn prepare(&self) -> Result<(), FileError> {
        remove_dir(&self.board_dir)?;
        create_dir(&self.board_dir)?;
        create_dir(&self.font_dir())
    }

    pub fn board_dir(&self) -> &std::path::Path {
        &self.board_dir
    }

    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.board_dir.join(format!("{}.bmp", name))
    }

    pub fn locale_dir(&self, locale: &str) -> PathBuf {
        self.board_dir.join("locale").join("ro").join(locale)
    }

    pub fn locale_asset_path(&self, locale: &str, name: &str) -> PathBuf {
        self.locale_dir(locale).join(format!("{}.bmp", name))
    }

    pub fn rw_locale_dir(&self, locale: &str) -> PathBuf {
        self.board_dir.join("rw").join("locale").join("ro").join(locale)
    }

    pub fn rw_locale_asset_path(&self, locale: &str, name: &str) -> PathBuf {
        self.rw_locale_dir(locale).join(format!("{}.bmp", name))
    }

    pub fn font_dir(&self) -> PathBuf {
        self.board_dir.join("font")
    }

    /// Glyph bitmaps are numbered sequentially in render order with the
    /// codepoint appended in hex.
    pub fn glyph_path(&self, index: u32, codepoint: u32) -> PathBuf {
        self.font_dir().join(format!("idx{:03}_{:x}.bmp", index, codepoint))
    }

    /// Writes the locale list CSV, one `code,rtl_flag` line per built
    /// locale in build order.
    pub fn write_locale_list(&self, locales: &[LocaleInfo]) -> Result<(), FileError> {
        let csv: String = locales.iter().map(|locale| {
            format!("{},{}\n", locale.code, u8::from(locale.rtl))

        }).collect();
        write_text_file(&self.board_dir.join("locales"), &csv)
    }

}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use std::path::Path;

    use board::LocaleInfo;

    use super::OutputLayout;

    fn layout() -> OutputLayout {
        OutputLayout::new(Path::new("/out"), "eve")
    }

    #[test]
    fn test_paths() {
        let layout = layout();
        assert_eq!(layout.asset_path("divider"), Path::new("/out/eve/divider.bmp"));
        assert_eq!(
            layout.locale_asset_path("de", "language"),
            Path::new("/out/eve/locale/ro/de/language.bmp")
        );
        assert_eq!(
            layout.rw_locale_asset_path("de", "firmware_sync"),
            Path::new("/out/eve/rw/locale/ro/de/firmware_sync.bmp")
        );
        // The first rendered glyph is space, so 'A' is the 33rd
        assert_eq!(layout.glyph_path(0, 0x20), Path::new("/out/eve/font/idx000_20.bmp"));
        assert_eq!(layout.glyph_path(33, 0x41), Path::new("/out/eve/font/idx033_41.bmp"));
    }

    #[test]
    fn test_locale_list_csv() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "eve");
        layout.prepare().unwrap();
        layout.write_locale_list(&[
            LocaleInfo { code: "en".to_string(), rtl: false, hi_res: true },
            LocaleInfo { code: "ar".to_string(), rtl: true, hi_res: false }
        ]).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("eve").join("locales")).unwrap();
        assert_eq!(csv, "en,0\nar,1\n");
    }
}

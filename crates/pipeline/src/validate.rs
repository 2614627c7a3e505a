// External Dependencies ------------------------------------------------------
use bitmap::{bmp, max_width_px, runtime_width_px, Geometry};
use board::{FormatConfig, LocaleInfo};
use file_io::read_binary_file;


// Internal Dependencies ------------------------------------------------------
use crate::error::BuildError;
use crate::output::OutputLayout;


// Final Width Validation -----------------------------------------------------
/// Re-opens every produced bitmap whose style declares a max width, reads
/// back the embedded line count and checks that the width the runtime
/// renderer will draw it at stays inside the budget.
///
/// The width searches already aim for this bound; the pass exists so a
/// search landing on an overshooting floor value fails the build instead
/// of shipping a bitmap the renderer cannot fit on screen.
pub fn validate_board(
    layout: &OutputLayout,
    format: &FormatConfig,
    geometry: &Geometry,
    locales: &[LocaleInfo],
    diagnostic_ui: bool

) -> Result<(), BuildError> {

    let canvas = geometry.canvas_px();

    for (name, category) in &format.files {
        let style = format.resolve_style(category)?;
        if style.max_width.is_some() {
            validate_bitmap(&layout.asset_path(name), &style, canvas)?;
        }
    }

    let localized = format.localized_files.iter().chain(
        format.diagnostic_files.iter().filter(|_| diagnostic_ui)
    );
    for (name, category) in localized {
        let style = format.resolve_style(category)?;
        if style.max_width.is_none() {
            continue;
        }
        for locale in locales {
            let path = layout.locale_asset_path(&locale.code, name);
            if path.is_file() {
                validate_bitmap(&path, &style, canvas)?;
            }
        }
    }
    Ok(())
}

fn validate_bitmap(
    path: &std::path::Path,
    style: &board::Style,
    canvas: u32

) -> Result<(), BuildError> {

    let bytes = read_binary_file(path)?;
    let decoded = bmp::decode(&bytes)?;
    let lines = bmp::line_count(&bytes)?;

    let width = runtime_width_px((decoded.width, decoded.height), style.height, lines, canvas);
    let budget = max_width_px(style.max_width.unwrap_or(0), canvas);
    if width > budget {
        return Err(BuildError::Validation {
            file: path.to_path_buf(),
            width,
            budget
        });
    }
    Ok(())
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use bitmap::{bmp, Geometry};
    use board::{FormatConfig, LocaleInfo};
    use image::RgbImage;

    use super::validate_board;
    use crate::error::BuildError;
    use crate::output::OutputLayout;

    const FORMAT: &str = r#"
        [localized_files]
        desc = "desc"

        [styles._DEFAULT_]
        background = "ffffff"
        foreground = "000000"

        [styles.desc]
        height = 100
        max_width = 500
    "#;

    fn locale(code: &str) -> LocaleInfo {
        LocaleInfo {
            code: code.to_string(),
            rtl: false,
            hi_res: true
        }
    }

    fn write_bitmap(path: &std::path::Path, width: u32, height: u32, lines: u8) {
        let image = RgbImage::from_pixel(width, height, image::Rgb([0, 0, 0]));
        let indexed = bitmap::quantize(&image, 2);
        let mut bytes = bmp::encode(&indexed);
        bmp::patch_line_count(&mut bytes, lines);
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_budget_honored() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "eve");
        layout.prepare().unwrap();
        std::fs::create_dir_all(layout.locale_dir("en")).unwrap();

        let format = FormatConfig::from_str(FORMAT).unwrap();
        let geometry = Geometry::new((1000, 1000), None).unwrap();

        // 4:1 aspect at height 100/1000 of 1000px renders 400px, within 500
        write_bitmap(&layout.locale_asset_path("en", "desc"), 400, 100, 1);
        validate_board(&layout, &format, &geometry, &[locale("en")], false).unwrap();
    }

    #[test]
    fn test_budget_violation_names_both_widths() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "eve");
        layout.prepare().unwrap();
        std::fs::create_dir_all(layout.locale_dir("en")).unwrap();

        let format = FormatConfig::from_str(FORMAT).unwrap();
        let geometry = Geometry::new((1000, 1000), None).unwrap();

        // 6:1 aspect renders 600px wide, over the 500px budget
        write_bitmap(&layout.locale_asset_path("en", "desc"), 600, 100, 1);
        let err = validate_board(&layout, &format, &geometry, &[locale("en")], false).unwrap_err();
        match err {
            BuildError::Validation { width, budget, .. } => {
                assert_eq!(width, 600);
                assert_eq!(budget, 500);
            },
            other => panic!("unexpected error: {:?}", other)
        }
    }

    #[test]
    fn test_line_count_scales_runtime_width() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "eve");
        layout.prepare().unwrap();
        std::fs::create_dir_all(layout.locale_dir("en")).unwrap();

        let format = FormatConfig::from_str(FORMAT).unwrap();
        let geometry = Geometry::new((1000, 1000), None).unwrap();

        // Two wrapped lines: drawn at 2 x 100 units tall, width follows the
        // aspect ratio and stays inside the budget.
        write_bitmap(&layout.locale_asset_path("en", "desc"), 400, 200, 2);
        validate_board(&layout, &format, &geometry, &[locale("en")], false).unwrap();
    }

    #[test]
    fn test_missing_locale_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "eve");
        layout.prepare().unwrap();

        let format = FormatConfig::from_str(FORMAT).unwrap();
        let geometry = Geometry::new((1000, 1000), None).unwrap();
        validate_board(&layout, &format, &geometry, &[locale("de")], false).unwrap();
    }
}

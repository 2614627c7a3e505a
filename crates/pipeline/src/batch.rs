// STD Dependencies -----------------------------------------------------------
use std::io::{Error as IOError, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;


// External Dependencies ------------------------------------------------------
use bitmap::Geometry;
use board::{
    resolve_locales, BoardConfig, ConfigError, FeatureFlags, FormatConfig, LocaleInfo,
    PhysicalPresence, RenameMap, Resolution
};
use file_io::{copy_file, create_dir, write_binary_file, FileError, Logger};
use rayon::prelude::*;
use render::{SearchCache, SvgConverter, TextRasterizer};


// Internal Dependencies ------------------------------------------------------
use crate::convert::{convert_sprite, convert_text, ConvertContext};
use crate::error::BuildError;
use crate::output::OutputLayout;
use crate::strings::{FallbackPolicy, LocaleStrings};
use crate::validate::validate_board;


// Constants ------------------------------------------------------------------
const ENGLISH: &str = "en";

/// Style category of the ASCII glyph bitmaps
const GLYPH_CATEGORY: &str = "font";

/// The printable ASCII range rendered into the font directory
const GLYPHS: std::ops::RangeInclusive<u32> = 0x20..=0x7e;


// Cancellation Token ---------------------------------------------------------
/// Shared cancellation flag. Set from the SIGINT handler in `main` and
/// polled by the workers between assets; a cancelled build reports
/// `BuildError::Aborted` instead of partial output.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>
}

impl CancelToken {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), BuildError> {
        if self.cancelled() {
            Err(BuildError::Aborted)

        } else {
            Ok(())
        }
    }

}


// Build Options --------------------------------------------------------------
/// Options collected once at startup from the CLI and the environment.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub output: PathBuf,
    pub assets_dir: PathBuf,
    pub strings_dir: PathBuf,
    pub locales: Option<Vec<String>>,
    pub detachable_ui: bool,
    pub diagnostic_ui: bool,
    pub physical_presence: Option<PhysicalPresence>,
    pub point_size: Option<u32>,
    pub fallback: FallbackPolicy
}


// Board Build Orchestration --------------------------------------------------
/// Builds all output bitmaps of one board: locale independent assets,
/// sprites and glyphs first, then every locale in parallel, finishing with
/// the locale list and the width validation pass.
pub fn build_board(
    config: &BoardConfig,
    format: &FormatConfig,
    options: &BuildOptions,
    rasterizer: &(dyn TextRasterizer + Sync),
    svg: Option<&SvgConverter>,
    cancel: &CancelToken,
    logger: &mut Logger

) -> Result<(), BuildError> {

    let mut config = config.clone();
    if let Some(presence) = options.physical_presence {
        config.physical_presence = presence;
    }

    let flags = FeatureFlags::new(&config, options.detachable_ui, options.diagnostic_ui);
    let renames = RenameMap::build(&flags)?;
    let geometry = Geometry::new(config.screen, config.panel)?;
    let locales = resolve_locales(&config, options.locales.as_deref())?;

    let layout = OutputLayout::new(&options.output, &config.name);
    layout.prepare()?;
    logger.status("Building", format!("board \"{}\" with {} locale(s)", config.name, locales.len()));

    let english = LocaleStrings::load(&options.strings_dir, ENGLISH)?;
    let context = ConvertContext {
        format,
        geometry: &geometry,
        text_colors: config.text_colors,
        dpi_ceiling: config.dpi,
        point_size: options.point_size
    };

    // Locale independent text assets render from the English baseline
    let mut cache = SearchCache::new();
    for (name, category) in &format.files {
        cancel.check()?;
        let source = match renames.resolve(name) {
            Resolution::Drop => continue,
            Resolution::Keep => name.as_str(),
            Resolution::Replace(target) => target
        };
        let text = english.entry(source).ok_or_else(|| missing_baseline(source))?;
        let bytes = convert_text(rasterizer, &context, ENGLISH, category, text, true, &mut cache)?;
        write_binary_file(&layout.asset_path(name), &bytes)?;
    }

    for (name, category) in &format.sprite_files {
        cancel.check()?;
        let source = match renames.resolve(name) {
            Resolution::Drop => continue,
            Resolution::Keep => name.as_str(),
            Resolution::Replace(target) => target
        };
        let path = sprite_source(&options.assets_dir, source)?;
        let bytes = convert_sprite(svg, &context, category, &path)?;
        write_binary_file(&layout.asset_path(name), &bytes)?;
    }

    build_glyphs(rasterizer, &context, &layout, cancel, &mut cache)?;

    // The English locale is built up front so the bitmap level fallback
    // always has a finished bitmap to copy.
    let mut warnings = Vec::new();
    let (english_first, rest): (Vec<&LocaleInfo>, Vec<&LocaleInfo>) =
        locales.iter().partition(|locale| locale.code == ENGLISH);
    for locale in english_first {
        warnings.extend(build_locale(
            locale, &config, format, &renames, &geometry, &english, &layout, options,
            rasterizer, cancel
        )?);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build()
        .map_err(|err| BuildError::Parallel(err.to_string()))?;
    let parallel = pool.install(|| {
        rest.par_iter().map(|&locale| {
            build_locale(
                locale, &config, format, &renames, &geometry, &english, &layout, options,
                rasterizer, cancel
            )

        }).collect::<Result<Vec<_>, BuildError>>()
    })?;
    for locale_warnings in parallel {
        warnings.extend(locale_warnings);
    }
    for warning in warnings {
        logger.warning(warning);
    }

    layout.write_locale_list(&locales)?;
    validate_board(&layout, format, &geometry, &locales, flags.diagnostic_ui)?;
    logger.status("Finished", format!("board \"{}\"", config.name));
    Ok(())
}


// Per Locale Worker ----------------------------------------------------------
#[allow(clippy::too_many_arguments)]
fn build_locale(
    locale: &LocaleInfo,
    config: &BoardConfig,
    format: &FormatConfig,
    renames: &RenameMap,
    geometry: &Geometry,
    english: &LocaleStrings,
    layout: &OutputLayout,
    options: &BuildOptions,
    rasterizer: &(dyn TextRasterizer + Sync),
    cancel: &CancelToken

) -> Result<Vec<String>, BuildError> {

    cancel.check()?;
    create_dir(&layout.locale_dir(&locale.code))?;

    let own_strings;
    let strings = if locale.code == ENGLISH {
        english

    } else {
        own_strings = LocaleStrings::load(&options.strings_dir, &locale.code)?;
        &own_strings
    };

    // Low resolution locales render at a reduced DPI ceiling and skip the
    // scaling step entirely; the runtime renderer scales them up to the
    // configured text height instead.
    let (dpi_ceiling, scaled) = if locale.hi_res {
        (config.dpi, true)

    } else {
        ((config.dpi / 2).max(1), false)
    };

    let context = ConvertContext {
        format,
        geometry,
        text_colors: config.text_colors,
        dpi_ceiling,
        point_size: options.point_size
    };
    let mut cache = SearchCache::new();
    let mut warnings = Vec::new();
    let mut rw_ready = false;

    let assets = format.localized_files.iter().chain(
        format.diagnostic_files.iter().filter(|_| options.diagnostic_ui)
    );
    for (name, category) in assets {
        cancel.check()?;
        let source = match renames.resolve(name) {
            Resolution::Drop => continue,
            Resolution::Keep => name.as_str(),
            Resolution::Replace(target) => target
        };

        let target = layout.locale_asset_path(&locale.code, name);
        match strings.entry(source) {
            Some(text) => {
                let bytes = convert_text(
                    rasterizer, &context, &locale.code, category, text, scaled, &mut cache
                )?;
                write_binary_file(&target, &bytes)?;
            },
            None if locale.code == ENGLISH => {
                return Err(missing_baseline(source));
            },
            None => match options.fallback {
                FallbackPolicy::TextEntry => {
                    let text = english.entry(source).ok_or_else(|| missing_baseline(source))?;
                    warnings.push(format!(
                        "Locale \"{}\" is missing \"{}\", rendering the English text",
                        locale.code, source
                    ));
                    let bytes = convert_text(
                        rasterizer, &context, &locale.code, category, text, scaled, &mut cache
                    )?;
                    write_binary_file(&target, &bytes)?;
                },
                FallbackPolicy::Bitmap => {
                    let english_bitmap = layout.locale_asset_path(ENGLISH, name);
                    if !english_bitmap.is_file() {
                        return Err(BuildError::MissingEnglishBitmap {
                            locale: locale.code.clone(),
                            name: name.clone()
                        });
                    }
                    warnings.push(format!(
                        "Locale \"{}\" is missing \"{}\", copying the English bitmap",
                        locale.code, source
                    ));
                    copy_file(&english_bitmap, &target)?;
                }
            }
        }

        if config.rw_overrides.iter().any(|rw| rw == name) {
            if !rw_ready {
                create_dir(&layout.rw_locale_dir(&locale.code))?;
                rw_ready = true;
            }
            copy_file(&target, &layout.rw_locale_asset_path(&locale.code, name))?;
        }
    }
    Ok(warnings)
}


// Glyph Rendering ------------------------------------------------------------
/// Renders the printable ASCII range into the font directory. Boards whose
/// manifest has no glyph style skip this stage.
fn build_glyphs(
    rasterizer: &(dyn TextRasterizer + Sync),
    context: &ConvertContext,
    layout: &OutputLayout,
    cancel: &CancelToken,
    cache: &mut SearchCache

) -> Result<(), BuildError> {

    match context.format.resolve_style(GLYPH_CATEGORY) {
        Ok(_) => (),
        Err(ConfigError::UnknownStyleCategory(_)) => return Ok(()),
        Err(err) => return Err(err.into())
    }

    for (index, code) in GLYPHS.enumerate() {
        cancel.check()?;
        let text = ((code as u8) as char).to_string();
        let bytes = convert_text(rasterizer, context, ENGLISH, GLYPH_CATEGORY, &text, true, cache)?;
        write_binary_file(&layout.glyph_path(index as u32, code), &bytes)?;
    }
    Ok(())
}


// Helpers --------------------------------------------------------------------
fn sprite_source(dir: &Path, name: &str) -> Result<PathBuf, BuildError> {
    for extension in ["svg", "png"] {
        let path = dir.join(format!("{}.{}", name, extension));
        if path.is_file() {
            return Ok(path);
        }
    }
    Err(BuildError::File(FileError::new(
        IOError::new(ErrorKind::NotFound, "no .svg or .png source found"),
        dir.join(name)
    )))
}

fn missing_baseline(name: &str) -> BuildError {
    BuildError::Translations {
        locale: ENGLISH.to_string(),
        message: format!("asset \"{}\" is missing from the English baseline", name)
    }
}

// STD Dependencies -----------------------------------------------------------
use std::env;
use std::path::{Path, PathBuf};
use std::process;


// External Dependencies ------------------------------------------------------
use board::{load_boards_config, FormatConfig, PhysicalPresence};
use clap::ArgMatches;
use file_io::{read_text_file, Logger};
use pipeline::{build_board, BuildError, BuildOptions, CancelToken, FallbackPolicy};
use render::{PangoRasterizer, SvgConverter};


// Modules --------------------------------------------------------------------
mod cli;


// CLI Interface --------------------------------------------------------------
fn main() {
    let mut logger = Logger::new();
    let matches = cli::app().get_matches();

    if matches.occurrences_of("silent") > 0 {
        logger.set_silent();
    }

    match run(&matches, &mut logger) {
        Ok(_) => {
            logger.flush();
        },
        Err(err) => {
            logger.error(Logger::format_error(err));
            process::exit(1);
        }
    }
}

fn run(matches: &ArgMatches, logger: &mut Logger) -> Result<(), String> {

    let config_path = matches.value_of("config").unwrap_or_default();
    let boards_text = read_text_file(Path::new(config_path)).map_err(|err| err.to_string())?;
    let boards = load_boards_config(&boards_text).map_err(|err| err.to_string())?;

    let format_path = matches.value_of("format").unwrap_or_default();
    let format_text = read_text_file(Path::new(format_path)).map_err(|err| err.to_string())?;
    let format = FormatConfig::from_str(&format_text).map_err(|err| err.to_string())?;

    // Environment options are read exactly once, here; CLI flags win
    let output = matches.value_of("output")
        .map(PathBuf::from)
        .or_else(|| env::var("OUTPUT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("build"));

    let locales = matches.value_of("locales")
        .map(str::to_string)
        .or_else(|| env::var("LOCALES").ok())
        .map(|list| list.split_whitespace().map(str::to_string).collect::<Vec<String>>())
        .filter(|list| !list.is_empty());

    let detachable_ui = matches.is_present("detachable-ui") || env_flag("DETACHABLE_UI");
    let diagnostic_ui = matches.is_present("diagnostic-ui") || env_flag("DIAGNOSTIC_UI");

    let presence = matches.value_of("physical-presence")
        .map(str::to_string)
        .or_else(|| env::var("PHY_PRES").ok());
    let physical_presence = match presence.as_deref() {
        Some("keyboard") => Some(PhysicalPresence::Keyboard),
        Some("power") => Some(PhysicalPresence::Power),
        Some("recovery") => Some(PhysicalPresence::Recovery),
        Some(other) => return Err(format!("Invalid physical presence mode \"{}\"", other)),
        None => None
    };

    let point_size = matches.value_of("point-size")
        .map(str::to_string)
        .or_else(|| env::var("FONTSIZE").ok())
        .map(|value| {
            value.parse::<u32>().map_err(|_| format!("Invalid font point size \"{}\"", value))
        })
        .transpose()?;

    let fallback = match matches.value_of("fallback") {
        Some("bitmap") => FallbackPolicy::Bitmap,
        _ => FallbackPolicy::TextEntry
    };

    let options = BuildOptions {
        output,
        assets_dir: PathBuf::from(matches.value_of("assets").unwrap_or_default()),
        strings_dir: PathBuf::from(matches.value_of("strings").unwrap_or_default()),
        locales,
        detachable_ui,
        diagnostic_ui,
        physical_presence,
        point_size,
        fallback
    };

    let rasterizer = PangoRasterizer::new(
        PathBuf::from(matches.value_of("text-to-png").unwrap_or_default())

    ).map_err(|err| err.to_string())?;
    let svg = SvgConverter::new(PathBuf::from(matches.value_of("svg-converter").unwrap_or_default()));

    let cancel = CancelToken::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || handler.cancel()).map_err(|err| err.to_string())?;

    let selected: Vec<String> = match matches.values_of("BOARD") {
        Some(values) => {
            let list: Vec<String> = values.map(str::to_string).collect();
            if list.iter().any(|board| board == "ALL") {
                boards.keys().cloned().collect()

            } else {
                list
            }
        },
        None => boards.keys().cloned().collect()
    };

    for name in &selected {
        let config = boards.get(name).ok_or_else(|| {
            BuildError::UnknownBoard(name.clone()).to_string()
        })?;
        build_board(config, &format, &options, &rasterizer, Some(&svg), &cancel, logger)
            .map_err(|err| err.to_string())?;
        logger.flush();
    }
    Ok(())
}

fn env_flag(name: &str) -> bool {
    matches!(env::var(name).ok().as_deref(), Some("1") | Some("true") | Some("yes"))
}

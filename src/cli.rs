// External Dependencies ------------------------------------------------------
use clap::{App, Arg};


// CLI Definition -------------------------------------------------------------
pub fn app() -> App<'static> {
    App::new("fwbmp")
        .version("0.3")
        .about("Builds the firmware screen bitmap assets for one or more boards")
        .arg(Arg::new("BOARD")
            .help("Boards to build; every configured board when omitted or when \"ALL\" is given")
            .multiple_values(true)
            .index(1)
        )
        .arg(Arg::new("config")
            .long("config")
            .short('c')
            .takes_value(true)
            .default_value("boards.toml")
            .help("Board configuration file")
        )
        .arg(Arg::new("format")
            .long("format")
            .short('f')
            .takes_value(true)
            .default_value("format.toml")
            .help("Asset manifest and style table")
        )
        .arg(Arg::new("strings")
            .long("strings")
            .takes_value(true)
            .default_value("strings")
            .help("Directory with per-locale translation files")
        )
        .arg(Arg::new("assets")
            .long("assets")
            .takes_value(true)
            .default_value("assets")
            .help("Directory with sprite and icon sources")
        )
        .arg(Arg::new("output")
            .long("output")
            .short('o')
            .takes_value(true)
            .help("Output root directory [env: OUTPUT]")
        )
        .arg(Arg::new("locales")
            .long("locales")
            .takes_value(true)
            .help("Space separated locale list override [env: LOCALES]")
        )
        .arg(Arg::new("detachable-ui")
            .long("detachable-ui")
            .help("Build the navigation variants for detachable devices [env: DETACHABLE_UI]")
        )
        .arg(Arg::new("diagnostic-ui")
            .long("diagnostic-ui")
            .help("Include the diagnostic screen assets [env: DIAGNOSTIC_UI]")
        )
        .arg(Arg::new("physical-presence")
            .long("physical-presence")
            .takes_value(true)
            .possible_values(["keyboard", "power", "recovery"])
            .help("Override the physical presence mode of all boards [env: PHY_PRES]")
        )
        .arg(Arg::new("point-size")
            .long("point-size")
            .takes_value(true)
            .help("Font point size override passed to the rasterizer [env: FONTSIZE]")
        )
        .arg(Arg::new("fallback")
            .long("fallback")
            .takes_value(true)
            .possible_values(["text", "bitmap"])
            .default_value("text")
            .help("Missing translation fallback: render the English text or copy the English bitmap")
        )
        .arg(Arg::new("text-to-png")
            .long("text-to-png")
            .takes_value(true)
            .default_value("text_to_png_svg")
            .help("External text layout rasterizer executable")
        )
        .arg(Arg::new("svg-converter")
            .long("svg-converter")
            .takes_value(true)
            .default_value("rsvg-convert")
            .help("External SVG rasterizer executable")
        )
        .arg(Arg::new("silent")
            .long("silent")
            .short('s')
            .help("Silences all logging output")
        )
}

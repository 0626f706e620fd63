//! binary bitmap font converter
//!
//! Reads a local bitmap font asset tree and writes a UFO font source that a
//! font compiler can turn into a binary font.

use std::path::PathBuf;

use bitmap_ufo::{
    AssetTree, BuildOptions, FontMetrics, Step, DEFAULT_SCALE, DEFAULT_UNITS_PER_EM, MAX_SCALE,
};

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log more; repeat for debug output. RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Trace every glyph and write the UFO package
    Build {
        /// Root of the asset tree, containing `texture` and `map`
        #[arg(short, long, default_value = "assets/font")]
        input: PathBuf,
        /// Directory to write `<font>.ufo` into
        #[arg(short, long, default_value = "assets/font/ufo")]
        output: PathBuf,
        /// The root descriptor's name, also used as the family name
        #[arg(short, long, default_value = "default")]
        font: String,
        /// Style name written to the font info
        #[arg(long, default_value = "Regular")]
        style: String,
        /// Font units per source pixel
        #[arg(short, long, default_value_t = DEFAULT_SCALE,
              value_parser = clap::value_parser!(i32).range(1..=i64::from(MAX_SCALE)))]
        scale: i32,
        /// Units per em written to the font info
        #[arg(long, default_value_t = DEFAULT_UNITS_PER_EM)]
        units_per_em: u32,
    },
    /// Print the metrics of every sheet and of the whole font
    Metrics {
        #[arg(short, long, default_value = "assets/font")]
        input: PathBuf,
        #[arg(short, long, default_value = "default")]
        font: String,
    },
    /// Report which conversion steps already have output on disk
    Status {
        #[arg(short, long, default_value = "assets/font")]
        input: PathBuf,
        #[arg(short, long, default_value = "assets/font/ufo")]
        output: PathBuf,
    },
}

fn main() {
    use clap::Parser as _;
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(args.command) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), bitmap_ufo::Error> {
    match command {
        Command::Build {
            input,
            output,
            font,
            style,
            scale,
            units_per_em,
        } => {
            let options = BuildOptions {
                input_dir: input,
                output_dir: output,
                font_name: font,
                style_name: style,
                scale,
                units_per_em,
            };
            let summary = bitmap_ufo::resolve_and_emit(&options)?;
            println!(
                "wrote {} glyphs to {} ({} blank, {} not found)",
                summary.glyphs,
                summary.ufo_dir.display(),
                summary.blank,
                summary.unlocated
            );
            println!(
                "ascender {}, descender {}",
                summary.metrics.ascender(scale),
                summary.metrics.descender(scale)
            );
        }
        Command::Metrics { input, font } => {
            let assets = AssetTree::new(&input);
            let map = bitmap_ufo::resolve(&assets.descriptor(&font))?;
            for (sheet, sizing) in &map.sizing {
                println!(
                    "{sheet}: ascent {}, height {}",
                    sizing.ascent, sizing.height
                );
            }
            let metrics = FontMetrics::from_sizing(&map.sizing);
            println!(
                "max ascent {}, max descent {}",
                metrics.max_ascent, metrics.max_descent
            );
        }
        Command::Status { input, output } => {
            let status = AssetTree::new(input).status(&output);
            let recommended = status.recommended();
            let blocked = status.blocked();
            for step in [Step::Everything, Step::Download, Step::MakeUfo, Step::Compile] {
                let note = if blocked.contains(&step) {
                    " (previous step missing)"
                } else if recommended == Some(step) {
                    " (recommended)"
                } else {
                    ""
                };
                println!("{step}{note}");
            }
        }
    }
    Ok(())
}

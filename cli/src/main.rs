//! unwiki CLI - render article collections to plain text

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use unwiki::convert::ConvertStats;
use unwiki::{convert_directory, Direction, DirectoryStore, Item, RenderOptions};

#[derive(Parser)]
#[command(name = "unwiki")]
#[command(version)]
#[command(about = "Render wiki article collections to fixed-width plain text", long_about = None)]
struct Cli {
    /// Extracted bundle directory
    #[arg(value_name = "BUNDLE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a bundle directory (outline.json, siteinfo.json, html/)
    Convert {
        /// Extracted bundle directory
        #[arg(value_name = "BUNDLE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print conversion statistics as JSON to stderr
        #[arg(long)]
        stats: bool,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Render a single HTML article
    Text {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show the outline of a bundle
    Info {
        /// Extracted bundle directory
        #[arg(value_name = "BUNDLE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct RenderArgs {
    /// Target column width
    #[arg(short, long, default_value_t = 75, env = "UNWIKI_WIDTH")]
    width: usize,

    /// Columns added per indent level
    #[arg(long, default_value_t = 2)]
    tab_width: usize,

    /// Do not wrap lines (whitespace is still compressed)
    #[arg(long)]
    no_wrap: bool,

    /// Omit footnote lists
    #[arg(long)]
    no_refs: bool,

    /// Default language before site metadata applies
    #[arg(long, default_value = "en")]
    lang: String,

    /// Default text direction
    #[arg(long, value_enum, default_value = "ltr")]
    dir: TextDirection,

    /// Wrap text against the base direction in Unicode isolate marks
    #[arg(long)]
    bidi_isolation: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TextDirection {
    /// Left to right
    Ltr,
    /// Right to left
    Rtl,
}

impl From<TextDirection> for Direction {
    fn from(dir: TextDirection) -> Self {
        match dir {
            TextDirection::Ltr => Direction::Ltr,
            TextDirection::Rtl => Direction::Rtl,
        }
    }
}

impl From<&RenderArgs> for RenderOptions {
    fn from(args: &RenderArgs) -> Self {
        RenderOptions::new()
            .with_column_width(args.width)
            .with_tab_width(args.tab_width)
            .with_no_wrap(args.no_wrap)
            .with_suppress_footnotes(args.no_refs)
            .with_language(args.lang.clone())
            .with_direction(args.dir.into())
            .with_bidi_isolation(args.bidi_isolation)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            stats,
            render,
        }) => cmd_convert(&input, output.as_deref(), &render, stats),
        Some(Commands::Text {
            input,
            output,
            render,
        }) => cmd_text(&input, output.as_deref(), &render),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if a bundle is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &cli.render, false)
            } else {
                println!("{}", "Usage: unwiki <BUNDLE> [OUTPUT]".yellow());
                println!("       unwiki --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Open the output file, or stdout.
fn open_output(output: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    render: &RenderArgs,
    show_stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = RenderOptions::from(render);
    log::debug!("Converting bundle {}", input.display());
    let writer = open_output(output)?;
    let stats = convert_directory(input, &options, writer)?;

    if let Some(path) = output {
        eprintln!("{} {}", "Saved to".green(), path.display());
    }
    report_unknown_macros(&stats);
    if show_stats {
        eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

fn report_unknown_macros(stats: &ConvertStats) {
    if stats.unknown_macros.is_empty() {
        return;
    }
    eprintln!(
        "{} {} unknown TeX macro(s): {}",
        "Warning:".yellow().bold(),
        stats.unknown_macros.len(),
        stats
            .unknown_macros
            .iter()
            .map(|m| format!("\\{}", m))
            .collect::<Vec<_>>()
            .join(" ")
    );
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    render: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let html = fs::read_to_string(input)?;
    let text = unwiki::to_text(&html, &RenderOptions::from(render))?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = DirectoryStore::open(input)?;
    let collection = store.collection()?;

    println!("{}", "Collection Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Bundle".bold(), store.root().display());
    println!("{}: {}", "Title".bold(), collection.title);
    if let Some(ref subtitle) = collection.subtitle {
        println!("{}: {}", "Subtitle".bold(), subtitle);
    }
    if let Some(ref lang) = collection.lang {
        println!("{}: {}", "Language".bold(), lang);
    }
    println!("{}: {}", "Articles".bold(), collection.articles().len());

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print_outline(&collection.items, 0);

    Ok(())
}

fn print_outline(items: &[Item], depth: usize) {
    let indent = "  ".repeat(depth);
    for item in items {
        match item {
            Item::Chapter { title, items } => {
                println!("{}{}", indent, title.bold());
                print_outline(items, depth + 1);
            }
            Item::Article {
                title,
                revision,
                wiki,
            } => {
                println!(
                    "{}{} {}",
                    indent,
                    title,
                    format!("(wiki {}, revision {})", wiki, revision).dimmed()
                );
            }
        }
    }
}

fn cmd_version() {
    println!("{} {}", "unwiki".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Wiki article collection to plain text renderer");
    println!();
    println!("License: MIT");
}

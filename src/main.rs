//! newsworthy - page document HTML codec

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use newsworthy::Editor;
use newsworthy::export::{HtmlConfig, HtmlVariant};
use newsworthy::import::is_editable_html;
use newsworthy::publish::publish_filename;

#[derive(Parser)]
#[command(name = "newsworthy")]
#[command(version, about = "Encode and decode page documents as HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    newsworthy encode story.json -o story.html    Render a standalone page
    newsworthy encode story.json --preview        Render the preview page to stdout
    newsworthy decode story.html -o story.json    Recover sections from a page
    newsworthy check story.html                   Test whether a page is editable")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Render stored sections (JSON) as HTML
    Encode {
        /// Sections JSON file
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,

        /// Render the preview page instead of the standalone page
        #[arg(long)]
        preview: bool,

        /// Page title
        #[arg(long)]
        title: Option<String>,
    },

    /// Recover sections (JSON) from an exported page
    Decode {
        /// HTML file
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },

    /// Report whether a page carries editable markup
    Check {
        /// HTML file
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Print the hosting filename for a page name
    Filename {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Encode {
            input,
            output,
            preview,
            title,
        } => encode(&input, output.as_deref(), preview, title),
        Command::Decode { input, output } => decode(&input, output.as_deref()),
        Command::Check { input } => match check(&input) {
            Ok(true) => Ok(()),
            Ok(false) => return ExitCode::FAILURE,
            Err(e) => Err(e),
        },
        Command::Filename { name } => {
            println!("{}", publish_filename(&name));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn encode(
    input: &str,
    output: Option<&str>,
    preview: bool,
    title: Option<String>,
) -> Result<(), String> {
    let json = fs::read_to_string(input).map_err(|e| format!("{input}: {e}"))?;

    let mut editor = Editor::new();
    let count = editor.load_json(&json).map_err(|e| e.to_string())?;
    log::info!("loaded {count} sections from {input}");

    let variant = if preview {
        HtmlVariant::Preview
    } else {
        HtmlVariant::Standalone
    };
    let mut config = HtmlConfig::default().with_variant(variant);
    if let Some(title) = title {
        config = config.with_title(title);
    }

    write_output(output, &editor.export_html(&config))
}

fn decode(input: &str, output: Option<&str>) -> Result<(), String> {
    let bytes = fs::read(input).map_err(|e| format!("{input}: {e}"))?;

    let mut editor = Editor::new();
    let count = editor
        .import_html_bytes(&bytes)
        .map_err(|e| e.to_string())?;
    if count == 0 {
        log::warn!("{input}: no sections found");
    }

    let json = serde_json::to_string_pretty(editor.sections()).map_err(|e| e.to_string())?;
    write_output(output, &json)
}

fn check(input: &str) -> Result<bool, String> {
    let html = fs::read(input).map_err(|e| format!("{input}: {e}"))?;
    let editable = is_editable_html(&String::from_utf8_lossy(&html));
    println!(
        "{input}: {}",
        if editable { "editable" } else { "not editable" }
    );
    Ok(editable)
}

fn write_output(output: Option<&str>, content: &str) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, content).map_err(|e| format!("{path}: {e}")),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .map_err(|e| e.to_string())
        }
    }
}

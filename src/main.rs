use std::fs;
use std::path::PathBuf;

use clap::Parser;

use mdstyled::{MonospaceMeasurer, Theme};

#[derive(Parser)]
#[command(name = "mdstyled")]
#[command(about = "Convert Markdown files to a styled text model")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Theme TOML file (defaults apply when omitted or unreadable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the run sequence as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let markdown = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let theme = match &cli.config {
        Some(path) => Theme::load(path),
        None => Theme::default(),
    };

    let styled = mdstyled::markdown_to_styled_with(&markdown, &theme, &MonospaceMeasurer::default());

    if cli.json {
        match serde_json::to_string_pretty(&styled) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing output: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", styled.plain_text());
    }
}

use std::path::PathBuf;

use clap::Parser;

/// Annotate Chinese text with pinyin, glosses and HSK levels
#[derive(Parser, Debug)]
#[command(name = "hanzi", version)]
pub struct Args {
    /// JSON config file
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Read the text to annotate from a file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Text to annotate. Without text or --file, stdin is read line by line.
    pub text: Vec<String>,
}

impl Args {
    /// Text given directly on the command line
    pub fn inline_text(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.join(" "))
        }
    }
}

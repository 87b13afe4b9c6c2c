use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "eduasistent",
    about = "Automatické porovnání a hodnocení textů žáků vůči vzorovému textu pomocí AI"
)]
pub struct CliArgs {
    /// Key-management command: set | get | delete
    #[arg(index = 1)]
    pub command: Option<String>,
    /// API key value for `set`
    #[arg(index = 2)]
    pub key_value: Option<String>,
    /// Reference text file (UTF-8 or Windows-1250)
    #[arg(long, short = 'r')]
    pub reference: Option<PathBuf>,
    /// Student text file; repeat for each file
    #[arg(long = "student", short = 's')]
    pub students: Vec<PathBuf>,
    /// Model tier (gpt-3.5-turbo or gpt-4)
    #[arg(long, short = 'm')]
    pub model: Option<String>,
    /// Sampling temperature, 0.0-1.0
    #[arg(long)]
    pub temperature: Option<f32>,
    /// API key override (otherwise OPENAI_API_KEY or the stored key)
    #[arg(long)]
    pub api_key: Option<String>,
    /// Chat API base URL override
    #[arg(long)]
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Export format: csv | excel
    #[arg(long, short = 'f')]
    pub format: Option<String>,
    /// Export file path (defaults to the format's standard name)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Print the full feedback for one result after the run
    #[arg(long)]
    pub detail: Option<String>,
    /// Print the decoded reference text before the run
    #[arg(long)]
    pub show_reference: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Set,
    Get,
    Delete,
}

impl CommandKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "set" => Some(Self::Set),
            "get" => Some(Self::Get),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl CliArgs {
    pub fn command_kind(&self) -> Option<CommandKind> {
        self.command.as_deref().and_then(CommandKind::parse)
    }
}

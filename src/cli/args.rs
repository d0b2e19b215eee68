use clap::{ArgAction, Args, Parser, Subcommand};

use crate::record::{Mood, Score};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "praiselog",
    version,
    about = "mood and praise journal backed by a spreadsheet web app",
    long_about = "praiselog records a score, a mood and a few words about the day into a spreadsheet-backed record store, lists what has been recorded, and exports it to Excel.\n\nExamples:\n  praiselog -e https://script.google.com/macros/s/<id>/exec list\n  praiselog submit --score 90 --mood 기쁨 --word 성실 --nickname minsu\n  praiselog export --dir ~/Documents\n\nTip: Use --config (or ~/.praiselog/config.yml) to keep the endpoint out of every invocation."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        visible_alias = "nc",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        long = "full",
        visible_alias = "full-text",
        global = true,
        help_heading = "Output",
        help = "Show long texts in full instead of truncating them."
    )]
    pub full_text: bool,

    #[arg(
        short = 'w',
        long = "width",
        visible_alias = "column-width",
        value_name = "CHARS",
        global = true,
        help_heading = "Output",
        help = "Truncate long texts to this many characters."
    )]
    pub column_width: Option<usize>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.praiselog/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'e',
        long = "endpoint",
        visible_alias = "url",
        value_name = "URL",
        global = true,
        help_heading = "Store",
        help = "Record store web app URL."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Store",
        help = "Request timeout in seconds (default: none)."
    )]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load the stored records and show them newest first.
    List {
        #[arg(
            short = 'f',
            long = "format",
            value_name = "FORMAT",
            default_value = "text",
            help = "Output format: text or json."
        )]
        format: String,
    },

    /// Save a new record, then show the refreshed list.
    Submit(SubmitArgs),

    /// Load the stored records and write them to my_praise_records.xlsx.
    Export {
        #[arg(
            short = 'd',
            long = "dir",
            value_name = "DIR",
            help = "Directory the workbook is written to."
        )]
        dir: Option<String>,
    },

    /// Show the score and mood choices.
    Form,

    /// Write the default config file if it does not exist yet.
    InitConfig,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(short = 's', long = "score", value_name = "SCORE", help = "Score: 10, 20, ..., 100.")]
    pub score: Score,

    #[arg(
        short = 'm',
        long = "mood",
        value_name = "MOOD",
        help = "Mood: 편안, 기쁨, 보통, 화남, 슬픔 (default 편안)."
    )]
    pub mood: Option<Mood>,

    #[arg(long = "word", value_name = "TEXT", default_value = "")]
    pub word: String,

    #[arg(long = "summary", value_name = "TEXT", default_value = "")]
    pub summary: String,

    #[arg(long = "praise", value_name = "TEXT", default_value = "")]
    pub praise: String,

    #[arg(long = "helpful", value_name = "TEXT", default_value = "")]
    pub helpful: String,

    #[arg(short = 'n', long = "nickname", value_name = "NAME", default_value = "")]
    pub nickname: String,
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "ytmp3",
    version,
    about = "Search YouTube and save the audio of a result as MP3"
)]
pub struct Cli {
    /// Enable verbose output for detailed logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search, optionally filter and pick, then download one result
    Get(GetArgs),
    /// Download the top result for a title
    Quick(QuickArgs),
    /// Interactive prompt; picks are downloaded in the background
    Shell(ShellArgs),
    /// List search results without downloading
    Search(SearchArgs),
    /// Report whether yt-dlp and ffmpeg are available
    Check,
    /// Print the effective settings
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Query to search for on YouTube
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of search results to retrieve and process
    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    /// Directory to save the downloaded MP3 files
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Keyword that must appear in the video title
    #[arg(long, value_name = "KEYWORD")]
    pub force: Option<String>,

    /// Ask for confirmation before downloading
    #[arg(long)]
    pub confirm: bool,

    /// Choose from the list of search results
    #[arg(long)]
    pub select: bool,
}

#[derive(Debug, Args)]
pub struct QuickArgs {
    /// Title to search for
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,

    /// Directory to save the MP3 in
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ShellArgs {
    /// Number of results listed per query
    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    /// Directory to save the MP3 files in
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Finish queued downloads before exiting
    #[arg(long)]
    pub wait: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    #[arg(long, value_name = "KEYWORD")]
    pub force: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the effective settings to the settings file
    #[arg(long)]
    pub init: bool,
}

pub fn join_words(words: &[String]) -> String {
    words.join(" ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn get_with_all_flags() {
        let cli = parse(&[
            "ytmp3", "get", "daft", "punk", "--depth", "10", "--output", "music", "--force",
            "live", "--confirm", "--select", "--verbose",
        ]);
        assert!(cli.verbose);
        let Command::Get(args) = cli.command else {
            panic!("expected get");
        };
        assert_eq!(join_words(&args.query), "daft punk");
        assert_eq!(args.depth, Some(10));
        assert_eq!(args.output, Some(PathBuf::from("music")));
        assert_eq!(args.force.as_deref(), Some("live"));
        assert!(args.confirm);
        assert!(args.select);
    }

    #[test]
    fn get_defaults() {
        let Command::Get(args) = parse(&["ytmp3", "get", "song"]).command else {
            panic!("expected get");
        };
        assert_eq!(args.depth, None);
        assert!(!args.confirm);
        assert!(!args.select);
    }

    #[test]
    fn query_is_required() {
        assert!(Cli::try_parse_from(["ytmp3", "get"]).is_err());
        assert!(Cli::try_parse_from(["ytmp3", "quick"]).is_err());
    }

    #[test]
    fn depth_must_be_a_number() {
        assert!(Cli::try_parse_from(["ytmp3", "get", "x", "--depth", "many"]).is_err());
    }

    #[test]
    fn shell_wait_flag() {
        let Command::Shell(args) = parse(&["ytmp3", "shell", "--wait", "-o", "dl"]).command else {
            panic!("expected shell");
        };
        assert!(args.wait);
        assert_eq!(args.output, Some(PathBuf::from("dl")));
    }

    #[test]
    fn global_config_flag() {
        let cli = parse(&["ytmp3", "--config", "/tmp/s.json", "check"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.json")));
        assert!(matches!(cli.command, Command::Check));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

use catalog_core::SortOption;

/// Browse, search and sort works from the Open Library catalog.
///
/// The list view and the detail view run the same controllers a browser UI
/// would; this binary renders their final state to the terminal.
#[derive(Parser, Debug)]
#[command(name = "catalog-browser")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Catalog API base URL (overrides `base_url` from the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List works in a subject, optionally filtered and sorted
    List(ListArgs),

    /// Show a single work by id (for example OL45804W)
    Show {
        /// Work id, with or without the `/works/` prefix
        id: String,
    },

    /// Open a route path: `/` for the list, `/book/{id}` for a work
    Open {
        /// Route path; unknown paths redirect to the list
        route: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the list view.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Subject to list (overrides `subject` from the config file)
    #[arg(long)]
    pub subject: Option<String>,

    /// Filter by title (local match first, then remote search)
    #[arg(short, long, conflicts_with = "year")]
    pub title: Option<String>,

    /// Filter by first publication year (±2 years)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=9999))]
    pub year: Option<i32>,

    /// Sort order: title-asc, title-desc, year-asc, year-desc
    #[arg(short, long, default_value_t = SortOption::default())]
    pub sort: SortOption,
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration and where it came from
    Show,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_list_defaults() {
        let cli = Cli::try_parse_from(["catalog-browser", "list"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.base_url.is_none());
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert!(args.subject.is_none());
        assert!(args.title.is_none());
        assert!(args.year.is_none());
        assert_eq!(args.sort, SortOption::TITLE_ASC);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["catalog-browser", "-v", "list"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = Cli::try_parse_from(["catalog-browser", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["catalog-browser", "-q", "-v", "list"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["catalog-browser", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_missing_subcommand_is_an_error() {
        let result = Cli::try_parse_from(["catalog-browser"]);
        assert!(result.is_err());
    }

    // ==================== List Tests ====================

    #[test]
    fn test_cli_list_parses_filters_and_sort() {
        let cli = Cli::try_parse_from([
            "catalog-browser",
            "list",
            "--subject",
            "science_fiction",
            "--title",
            "dune",
            "--sort",
            "year-desc",
        ])
        .unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.subject.as_deref(), Some("science_fiction"));
        assert_eq!(args.title.as_deref(), Some("dune"));
        assert_eq!(args.sort, SortOption::YEAR_DESC);
    }

    #[test]
    fn test_cli_list_title_conflicts_with_year() {
        let err = Cli::try_parse_from(["catalog-browser", "list", "-t", "dune", "-y", "1965"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_list_rejects_year_zero() {
        let err = Cli::try_parse_from(["catalog-browser", "list", "--year", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_list_rejects_unknown_sort() {
        let err =
            Cli::try_parse_from(["catalog-browser", "list", "--sort", "pages-asc"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    // ==================== Show / Open / Config Tests ====================

    #[test]
    fn test_cli_show_requires_id() {
        let cli = Cli::try_parse_from(["catalog-browser", "show", "OL45804W"]).unwrap();
        assert!(matches!(cli.command, Command::Show { ref id } if id == "OL45804W"));

        let err = Cli::try_parse_from(["catalog-browser", "show"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_global_base_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "catalog-browser",
            "open",
            "/book/OL1W",
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:9"));
        assert!(matches!(cli.command, Command::Open { ref route } if route == "/book/OL1W"));
    }

    #[test]
    fn test_cli_config_show() {
        let cli = Cli::try_parse_from(["catalog-browser", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
    }
}

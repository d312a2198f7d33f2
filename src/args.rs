//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags while gracefully handling unknown options.

use chrono::NaiveTime;

use crate::logger::Log;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the daemon with these settings
    Run { debug_enabled: bool },
    /// Print the soundscape for now, or for a time of day today
    Status {
        debug_enabled: bool,
        at: Option<NaiveTime>,
    },
    /// Ask the running daemon to reload its configuration
    Reload { debug_enabled: bool },
    /// Ask the running daemon to unlock (or refresh) its audio
    Unlock { debug_enabled: bool },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Parse a time of day given as `HH:MM` or `HH:MM:SS`.
fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut show_status = false;
        let mut status_time: Option<NaiveTime> = None;
        let mut run_reload = false;
        let mut run_unlock = false;
        let mut unknown_arg_found = false;

        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--reload" | "-r" => run_reload = true,
                "--unlock" | "-u" => run_unlock = true,
                "--status" | "-s" => {
                    show_status = true;
                    // Optional time of day: --status [HH:MM]
                    if let Some(next) = args_vec.get(i + 1) {
                        if !next.starts_with('-') {
                            match parse_time_of_day(next) {
                                Some(time) => status_time = Some(time),
                                None => {
                                    Log::log_warning(&format!(
                                        "Invalid time for --status: {} (expected HH:MM)",
                                        next
                                    ));
                                    unknown_arg_found = true;
                                }
                            }
                            i += 1;
                        }
                    }
                }
                _ => {
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                        unknown_arg_found = true;
                    }
                    // Non-option arguments are currently ignored
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if show_status {
            CliAction::Status {
                debug_enabled,
                at: status_time,
            }
        } else if run_reload {
            CliAction::Reload { debug_enabled }
        } else if run_unlock {
            CliAction::Unlock { debug_enabled }
        } else {
            CliAction::Run { debug_enabled }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: ambientr [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-d, --debug               Enable detailed debug output");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-r, --reload              Reload the configuration of the running daemon");
    Log::log_indented("-s, --status [HH:MM]      Show the soundscape for now or a time today");
    Log::log_indented("-u, --unlock              Unlock or refresh audio of the running daemon");
    Log::log_indented("-V, --version             Print version information");
    Log::log_end();
}

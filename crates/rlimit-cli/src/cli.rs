//! Command-line driver: argument parsing, mode selection and dispatch.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use rlimit_core::LimitRequest;

use crate::config::Config;
use crate::controller::{Action, Controller, ResourceRequest};
use crate::error::RlimitError;
use crate::resources;
use crate::structured_log::{LogEmitter, LogLevel};
use crate::sys::{self, HostLimits, LimitSource};

/// Value recorded for a resource flag given without `=value`. A NUL byte
/// cannot appear in a real argument.
const QUERY_ONLY: &str = "\0";

const COPYRIGHT: &str = "2026 the rlimit contributors";

const EPILOGUE: &str = "\
Soft and/or hard limits may be given as SOFT[,HARD]. To set only the hard
limit, start the value with a comma. Values may end in 'k', 'm' or 'g' to
multiply by 1,000, 1,000,000 or 1,000,000,000, or in 'K', 'M' or 'G' to
multiply by 1,024, 1,048,576 or 1,073,741,824. 'unlimited' removes a limit.
If the hard limit ends up below the soft limit, the soft limit is lowered.

With no limits and no command, all limits are printed. With a command, the
given limits are set and the command replaces this process.";

/// What the command line asks for once help/version are ruled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    NoLimitsRequested,
    LimitsRequestedOnly,
    LimitsRequestedWithCommand,
}

/// A fully parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Config,
    /// Resource flags in command-line order.
    pub requests: Vec<ResourceRequest>,
    /// Program and arguments to exec, empty if none.
    pub command: Vec<OsString>,
}

impl Invocation {
    pub fn mode(&self) -> Mode {
        if !self.command.is_empty() {
            Mode::LimitsRequestedWithCommand
        } else if !self.requests.is_empty() {
            Mode::LimitsRequestedOnly
        } else {
            Mode::NoLimitsRequested
        }
    }
}

/// Result of argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Invocation),
    Help,
    Version,
}

/// The clap definition. Resource options are generated from the table.
pub fn command() -> Command {
    let mut cmd = Command::new("rlimit")
        .about("Get or set process resource limits, then optionally run a command")
        .override_usage("rlimit [OPTIONS] [COMMAND]...")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .after_help(EPILOGUE);

    for resource in resources::all() {
        cmd = cmd.arg(
            Arg::new(resource.long)
                .long(resource.long)
                .value_name("SOFT[,HARD]")
                .help(format!(
                    "Get or set {} limit (short form: -{}SOFT[,HARD]).",
                    resource.name, resource.short
                ))
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value(QUERY_ONLY)
                .value_parser(value_parser!(String))
                .action(ArgAction::Append),
        );
    }

    cmd.arg(
        Arg::new("verbose")
            .short('v')
            .action(ArgAction::Count)
            .help("Increase verbosity."),
    )
    .arg(
        Arg::new("human")
            .short('h')
            .action(ArgAction::SetTrue)
            .help("Print values in human readable form."),
    )
    .arg(
        Arg::new("help")
            .long("help")
            .action(ArgAction::SetTrue)
            .help("Print this help screen and exit."),
    )
    .arg(
        Arg::new("version")
            .short('V')
            .long("version")
            .action(ArgAction::SetTrue)
            .help("Print version information and exit."),
    )
    .arg(
        Arg::new("command")
            .value_name("COMMAND")
            .num_args(1..)
            .trailing_var_arg(true)
            .value_parser(value_parser!(OsString))
            .help("Command to run with the new limits."),
    )
}

/// Rewrite short resource flags into their long spelling.
///
/// A short resource flag only takes an attached value: the rest of its
/// cluster. `-c` becomes `--cpu` and `-vc30` becomes `-v --cpu=30`, so the
/// next word is never read as a value. Rewriting stops at `--` and at the
/// first word that is not an option.
pub fn expand_short_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut out: Vec<OsString> = args.next().into_iter().collect();

    for arg in args.by_ref() {
        let bytes = arg.as_encoded_bytes();
        if bytes.len() < 2 || bytes[0] != b'-' || bytes == b"--" {
            out.push(arg);
            break;
        }
        if let Some(cluster) = arg
            .to_str()
            .and_then(|text| text.strip_prefix('-'))
            .filter(|rest| !rest.starts_with('-'))
        {
            out.extend(split_cluster(cluster));
            continue;
        }
        out.push(arg);
    }

    out.extend(args);
    out
}

/// Split one `-` cluster. Characters before the first resource flag stay
/// a cluster for clap; the resource flag consumes the remainder.
fn split_cluster(cluster: &str) -> Vec<OsString> {
    let mut words = Vec::new();
    let mut flags = String::from("-");

    for (at, short) in cluster.char_indices() {
        let Some(resource) = resources::by_short(short) else {
            flags.push(short);
            continue;
        };
        if flags.len() > 1 {
            words.push(OsString::from(flags));
        }
        let value = &cluster[at + short.len_utf8()..];
        let long = if value.is_empty() {
            format!("--{}", resource.long)
        } else {
            format!("--{}={value}", resource.long)
        };
        words.push(OsString::from(long));
        return words;
    }

    words.push(OsString::from(flags));
    words
}

/// Parse `args` (including the program name).
pub fn parse_from<I, T>(args: I) -> Result<Parsed, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let matches = command().try_get_matches_from(expand_short_flags(args))?;

    if matches.get_flag("help") {
        return Ok(Parsed::Help);
    }
    if matches.get_flag("version") {
        return Ok(Parsed::Version);
    }

    let config = Config {
        verbosity: matches.get_count("verbose"),
        human_readable: matches.get_flag("human"),
    };
    let command = matches
        .get_many::<OsString>("command")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(Parsed::Run(Invocation {
        config,
        requests: collect_requests(&matches),
        command,
    }))
}

/// Gather resource flags in argv order.
fn collect_requests(matches: &ArgMatches) -> Vec<ResourceRequest> {
    let mut found: Vec<(usize, ResourceRequest)> = Vec::new();

    for resource in resources::all() {
        let (Some(indices), Some(values)) = (
            matches.indices_of(resource.long),
            matches.get_many::<String>(resource.long),
        ) else {
            continue;
        };
        for (index, value) in indices.zip(values) {
            let action = if value == QUERY_ONLY {
                Action::Query
            } else {
                Action::Set(LimitRequest::parse(value))
            };
            found.push((index, ResourceRequest { resource, action }));
        }
    }

    found.sort_by_key(|(index, _)| *index);
    found.into_iter().map(|(_, request)| request).collect()
}

/// Run against the host's limits, writing reports to standard output.
pub fn execute(invocation: &Invocation) -> Result<(), RlimitError> {
    let log = LogEmitter::for_verbosity(invocation.config.verbosity);
    let mut controller = Controller::new(HostLimits, invocation.config, io::stdout().lock(), log);

    let result = dispatch(&mut controller, invocation);
    if let Err(err) = &result {
        controller.log_mut().emit_error(err);
    }
    result
}

/// Drive `controller` through the mode `invocation` selects.
///
/// In command mode this only returns if the exec fails.
pub fn dispatch<S: LimitSource, W: Write>(
    controller: &mut Controller<S, W>,
    invocation: &Invocation,
) -> Result<(), RlimitError> {
    match invocation.mode() {
        Mode::NoLimitsRequested => controller.list_all(resources::all())?,
        Mode::LimitsRequestedOnly => {
            for request in &invocation.requests {
                controller.process(request)?;
            }
        }
        Mode::LimitsRequestedWithCommand => {
            for request in &invocation.requests {
                controller.process(request)?;
            }
            controller.flush()?;

            let command = display_command(&invocation.command);
            let log = controller.log_mut();
            if log.is_enabled() {
                let entry = log
                    .entry(LogLevel::Info, "command.exec")
                    .with_details(serde_json::json!({ "command": command }));
                log.emit(&entry);
            }

            let source = sys::exec(&invocation.command);
            return Err(RlimitError::Exec { command, source });
        }
    }
    controller.flush()
}

/// Render argv for messages. Arguments with whitespace are single-quoted.
pub fn display_command(argv: &[OsString]) -> String {
    argv.iter()
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.chars().any(char::is_whitespace) {
                format!("'{}'", arg.replace('\'', r"'\''"))
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full help screen.
pub fn help_text() -> String {
    command().render_long_help().to_string()
}

/// Name, version, copyright, author and license.
pub fn version_banner() -> String {
    format!(
        "rlimit {}\nCopyright: (c) {}\n   Author: {}\n  License: {}\n",
        env!("CARGO_PKG_VERSION"),
        COPYRIGHT,
        env!("CARGO_PKG_AUTHORS"),
        env!("CARGO_PKG_LICENSE"),
    )
}

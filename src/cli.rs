//! Command-line interface for lead-console.
//!
//! Uses lexopt for minimal binary size overhead (~34KB).

use std::ffi::OsString;
use std::path::PathBuf;

use lexopt::Parser;
use thiserror::Error;

use crate::api::LeadStatus;
use crate::listing::{SortOrder, StatusFilter};

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// API base URL (overrides config file).
    pub api_url: Option<String>,
    /// Session file (overrides config file).
    pub session_file: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Print API data as JSON instead of text.
    pub json: bool,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
    /// Command to run.
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login {
        username: String,
        password: Option<String>,
    },
    Logout,
    Whoami,
    Dashboard,
    Leads(LeadsCommand),
    Users(UsersCommand),
    Testimonials(TestimonialsCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeadsCommand {
    List { sort: SortOrder, page: usize },
    Status { id: String, status: LeadStatus },
    /// `user: None` unassigns.
    Assign { id: String, user: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum UsersCommand {
    List,
    Create {
        username: String,
        email: Option<String>,
        password: Option<String>,
        role: String,
    },
    Update {
        id: String,
        role: String,
        email: Option<String>,
        password: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestimonialsCommand {
    List { filter: StatusFilter },
    Approve { id: String },
    Reject { id: String },
    Delete { id: String },
}

/// Role given to new users unless `--role` says otherwise.
pub const DEFAULT_ROLE: &str = "ADMIN";

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('u') | Long("api-url") => {
                result.api_url = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("session-file") => {
                result.session_file = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Long("json") => {
                result.json = true;
            }
            Value(val) => {
                let name = val.string()?;
                result.command = Some(parse_command(&name, &mut parser)?);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

fn parse_command(name: &str, parser: &mut Parser) -> Result<Command, ArgsError> {
    match name {
        "login" => parse_login(parser),
        "logout" => finish(parser).map(|_| Command::Logout),
        "whoami" => finish(parser).map(|_| Command::Whoami),
        "dashboard" => finish(parser).map(|_| Command::Dashboard),
        "leads" => {
            let action = required(parser, "leads action")?;
            parse_leads(&action, parser).map(Command::Leads)
        }
        "users" => {
            let action = required(parser, "users action")?;
            parse_users(&action, parser).map(Command::Users)
        }
        "testimonials" => {
            let action = required(parser, "testimonials action")?;
            parse_testimonials(&action, parser).map(Command::Testimonials)
        }
        other => Err(ArgsError::UnknownCommand(other.to_string())),
    }
}

fn parse_login(parser: &mut Parser) -> Result<Command, ArgsError> {
    use lexopt::prelude::*;

    let mut username = None;
    let mut password = None;

    while let Some(arg) = parser.next()? {
        match arg {
            Short('p') | Long("password") => {
                password = Some(parser.value()?.string()?);
            }
            Value(val) if username.is_none() => {
                username = Some(val.string()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(Command::Login {
        username: username.ok_or(ArgsError::MissingArgument("username"))?,
        password,
    })
}

fn parse_leads(action: &str, parser: &mut Parser) -> Result<LeadsCommand, ArgsError> {
    use lexopt::prelude::*;

    match action {
        "list" => {
            let mut sort = SortOrder::default();
            let mut page = 1;
            while let Some(arg) = parser.next()? {
                match arg {
                    Long("sort") => {
                        let value = parser.value()?.string()?;
                        sort = value
                            .parse()
                            .map_err(|_| ArgsError::InvalidValue("sort", value))?;
                    }
                    Long("page") => {
                        let value = parser.value()?.string()?;
                        page = value
                            .parse()
                            .ok()
                            .filter(|p| *p > 0)
                            .ok_or(ArgsError::InvalidValue("page", value))?;
                    }
                    _ => return Err(arg.unexpected().into()),
                }
            }
            Ok(LeadsCommand::List { sort, page })
        }
        "status" => {
            let id = required(parser, "lead id")?;
            let value = required(parser, "status")?;
            let status = value
                .parse()
                .map_err(|_| ArgsError::InvalidValue("status", value))?;
            finish(parser)?;
            Ok(LeadsCommand::Status { id, status })
        }
        "assign" => {
            let id = required(parser, "lead id")?;
            let user = optional(parser)?;
            finish(parser)?;
            Ok(LeadsCommand::Assign { id, user })
        }
        other => Err(ArgsError::UnknownCommand(format!("leads {other}"))),
    }
}

fn parse_users(action: &str, parser: &mut Parser) -> Result<UsersCommand, ArgsError> {
    use lexopt::prelude::*;

    match action {
        "list" => finish(parser).map(|_| UsersCommand::List),
        "create" | "update" => {
            let target = required(parser, if action == "create" { "username" } else { "user id" })?;
            let mut email = None;
            let mut password = None;
            let mut role = DEFAULT_ROLE.to_string();

            while let Some(arg) = parser.next()? {
                match arg {
                    Short('e') | Long("email") => email = Some(parser.value()?.string()?),
                    Short('p') | Long("password") => password = Some(parser.value()?.string()?),
                    Short('r') | Long("role") => {
                        role = parser.value()?.string()?.to_ascii_uppercase();
                    }
                    _ => return Err(arg.unexpected().into()),
                }
            }

            if action == "create" {
                Ok(UsersCommand::Create {
                    username: target,
                    email,
                    password,
                    role,
                })
            } else {
                Ok(UsersCommand::Update {
                    id: target,
                    role,
                    email,
                    password,
                })
            }
        }
        "delete" => {
            let id = required(parser, "user id")?;
            finish(parser)?;
            Ok(UsersCommand::Delete { id })
        }
        other => Err(ArgsError::UnknownCommand(format!("users {other}"))),
    }
}

fn parse_testimonials(
    action: &str,
    parser: &mut Parser,
) -> Result<TestimonialsCommand, ArgsError> {
    use lexopt::prelude::*;

    match action {
        "list" => {
            let mut filter = StatusFilter::All;
            while let Some(arg) = parser.next()? {
                match arg {
                    Long("status") => {
                        let value = parser.value()?.string()?;
                        filter = value
                            .parse()
                            .map_err(|_| ArgsError::InvalidValue("status", value))?;
                    }
                    _ => return Err(arg.unexpected().into()),
                }
            }
            Ok(TestimonialsCommand::List { filter })
        }
        "approve" | "reject" | "delete" => {
            let id = required(parser, "testimonial id")?;
            finish(parser)?;
            Ok(match action {
                "approve" => TestimonialsCommand::Approve { id },
                "reject" => TestimonialsCommand::Reject { id },
                _ => TestimonialsCommand::Delete { id },
            })
        }
        other => Err(ArgsError::UnknownCommand(format!("testimonials {other}"))),
    }
}

/// Next positional argument, if any.
fn optional(parser: &mut Parser) -> Result<Option<String>, ArgsError> {
    use lexopt::prelude::*;

    match parser.next()? {
        Some(Value(val)) => Ok(Some(val.string()?)),
        Some(arg) => Err(arg.unexpected().into()),
        None => Ok(None),
    }
}

fn required(parser: &mut Parser, name: &'static str) -> Result<String, ArgsError> {
    optional(parser)?.ok_or(ArgsError::MissingArgument(name))
}

/// Reject anything left on the command line.
fn finish(parser: &mut Parser) -> Result<(), ArgsError> {
    match optional(parser)? {
        Some(extra) => Err(ArgsError::UnexpectedArgument(extra)),
        None => Ok(()),
    }
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"lead-console {version}
Admin console for the loan-lead dashboard API

USAGE:
    lead-console [OPTIONS] <COMMAND>

COMMANDS:
    login <USERNAME> [-p <PASSWORD>]      Sign in and store the session
    logout                                Clear the stored session
    whoami                                Show the signed-in admin
    dashboard                             Summary figures
    leads list [--sort newest|oldest] [--page N]
    leads status <ID> <STATUS>            SUBMITTED, UNDER_REVIEW, APPROVED,
                                          REJECTED or COMPLETED
    leads assign <ID> [USER_ID]           Omit USER_ID to unassign
    users list
    users create <USERNAME> -p <PASSWORD> [-e <EMAIL>] [-r <ROLE>]
    users update <ID> [-r <ROLE>] [-e <EMAIL>] [-p <PASSWORD>]
    users delete <ID>
    testimonials list [--status all|pending|approved|rejected]
    testimonials approve|reject|delete <ID>

OPTIONS:
    -c, --config <FILE>         Path to configuration file (JSON)
    -u, --api-url <URL>         API base URL [default: http://localhost:4000]
    -s, --session-file <FILE>   Session file [default: ~/.lead-console/session.json]
    -l, --log-level <LVL>       Log level (error, warn, info, debug, trace)
        --json                  Print API data as JSON
    -h, --help                  Print help
    -V, --version               Print version

ENVIRONMENT VARIABLES:
    LEAD_CONSOLE_API_URL        API base URL (overrides config)
    LEAD_CONSOLE_SESSION_FILE   Session file (overrides config)
    LEAD_CONSOLE_PASSWORD       Password for `login` when -p is not given
    LEAD_CONSOLE_LOG_LEVEL      Log level (overrides config)
    RUST_LOG                    Alternative log level setting

EXAMPLES:
    lead-console login admin
    lead-console leads list --sort oldest --page 2
    lead-console leads status 42 APPROVED
    lead-console testimonials list --status pending
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("lead-console {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Error, Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    #[error("{0}")]
    Lexopt(#[from] lexopt::Error),
    /// Invalid argument value.
    #[error("invalid value for --{0}: '{1}'")]
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    #[error("unexpected argument: '{0}'")]
    UnexpectedArgument(String),
    /// Required positional argument is missing.
    #[error("missing argument: <{0}>")]
    MissingArgument(&'static str),
    /// Unknown command or action.
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestimonialStatus;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("lead-console")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.command.is_none());
        assert!(result.config.is_none());
        assert!(!result.json);
    }

    #[test]
    fn test_global_options() {
        let result = parse_args_from(args(&[
            "-u",
            "http://api.local:4000",
            "-s",
            "/tmp/s.json",
            "-l",
            "debug",
            "--json",
            "whoami",
        ]))
        .unwrap();

        assert_eq!(result.api_url.as_deref(), Some("http://api.local:4000"));
        assert_eq!(result.session_file, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(result.log_level.as_deref(), Some("debug"));
        assert!(result.json);
        assert_eq!(result.command, Some(Command::Whoami));
    }

    #[test]
    fn test_help_and_version_flags() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--help"])).unwrap().help);
        assert!(parse_args_from(args(&["-V"])).unwrap().version);
    }

    #[test]
    fn test_login() {
        let result = parse_args_from(args(&["login", "admin", "-p", "pw"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Login {
                username: "admin".into(),
                password: Some("pw".into()),
            })
        );

        assert!(matches!(
            parse_args_from(args(&["login"])),
            Err(ArgsError::MissingArgument("username"))
        ));
    }

    #[test]
    fn test_leads_list() {
        let result = parse_args_from(args(&["leads", "list"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Leads(LeadsCommand::List {
                sort: SortOrder::Newest,
                page: 1,
            }))
        );

        let result =
            parse_args_from(args(&["leads", "list", "--sort", "oldest", "--page", "3"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Leads(LeadsCommand::List {
                sort: SortOrder::Oldest,
                page: 3,
            }))
        );
    }

    #[test]
    fn test_leads_list_invalid_page() {
        assert!(parse_args_from(args(&["leads", "list", "--page", "0"])).is_err());
        assert!(parse_args_from(args(&["leads", "list", "--page", "x"])).is_err());
    }

    #[test]
    fn test_leads_status_and_assign() {
        let result = parse_args_from(args(&["leads", "status", "l1", "approved"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Leads(LeadsCommand::Status {
                id: "l1".into(),
                status: LeadStatus::Approved,
            }))
        );

        let result = parse_args_from(args(&["leads", "assign", "l1"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Leads(LeadsCommand::Assign {
                id: "l1".into(),
                user: None,
            }))
        );

        assert!(parse_args_from(args(&["leads", "status", "l1", "DONE"])).is_err());
    }

    #[test]
    fn test_users_create() {
        let result = parse_args_from(args(&[
            "users", "create", "ops_admin", "-p", "S3cret!pass", "-e", "ops@x.com", "-r", "staff",
        ]))
        .unwrap();

        assert_eq!(
            result.command,
            Some(Command::Users(UsersCommand::Create {
                username: "ops_admin".into(),
                email: Some("ops@x.com".into()),
                password: Some("S3cret!pass".into()),
                role: "STAFF".into(),
            }))
        );
    }

    #[test]
    fn test_users_update_defaults_role() {
        let result = parse_args_from(args(&["users", "update", "u1", "-e", "a@b.co"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Users(UsersCommand::Update {
                id: "u1".into(),
                role: DEFAULT_ROLE.into(),
                email: Some("a@b.co".into()),
                password: None,
            }))
        );
    }

    #[test]
    fn test_testimonials() {
        let result =
            parse_args_from(args(&["testimonials", "list", "--status", "pending"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Testimonials(TestimonialsCommand::List {
                filter: StatusFilter::Only(TestimonialStatus::Pending),
            }))
        );

        let result = parse_args_from(args(&["testimonials", "reject", "t9"])).unwrap();
        assert_eq!(
            result.command,
            Some(Command::Testimonials(TestimonialsCommand::Reject {
                id: "t9".into()
            }))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse_args_from(args(&["frobnicate"])),
            Err(ArgsError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_args_from(args(&["users", "promote"])),
            Err(ArgsError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_trailing_argument_rejected() {
        assert!(matches!(
            parse_args_from(args(&["logout", "now"])),
            Err(ArgsError::UnexpectedArgument(_))
        ));
    }
}

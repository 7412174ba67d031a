//! lead-console binary entry point.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use lead_console::api::{NewUser, TestimonialStatus, UserUpdate};
use lead_console::cli::{self, Command, LeadsCommand, TestimonialsCommand, UsersCommand};
use lead_console::listing::{self, DEFAULT_PER_PAGE};
use lead_console::validation::{self, rules, FieldRule, FormErrors};
use lead_console::{logging, AdminApi, Config, DispatchError, LoginPrompt, Navigator};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
enum CliError {
    #[error("{}", describe(.0))]
    Dispatch(#[from] DispatchError),
    #[error("{0}")]
    Invalid(#[from] FormErrors),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("not signed in; run `lead-console login <USERNAME>`")]
    NotSignedIn,
}

fn describe(err: &DispatchError) -> String {
    match err.status() {
        0 => err.message().to_string(),
        status => format!("{} (HTTP {status})", err.message()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Try 'lead-console --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _ = logging::init_with_level(config.log_filter());
    debug!("lead-console v{}", env!("CARGO_PKG_VERSION"));

    let Some(command) = args.command else {
        cli::print_help();
        return ExitCode::from(2);
    };

    let navigator: Arc<dyn Navigator> = Arc::new(LoginPrompt::new("lead-console login"));
    let api = match config.admin_api(Some(navigator)) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&api, command, args.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(api: &AdminApi, command: Command, json: bool) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let password = password.or_else(|| std::env::var("LEAD_CONSOLE_PASSWORD").ok());
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            check(&[
                ("username", rules::required(), Some(username.as_str())),
                ("password", rules::required(), Some(password.as_str())),
            ])?;

            let user = api.auth().login(&username, &password).await?;
            println!("Signed in as {} ({})", user.username, user.role);
        }
        Command::Logout => {
            api.auth().logout();
            println!("Signed out");
        }
        Command::Whoami => {
            let user = api.auth().current_user().ok_or(CliError::NotSignedIn)?;
            if json {
                print_json(&user)?;
            } else {
                println!("{} ({})", user.username, user.role);
                if let Some(email) = &user.email {
                    println!("{email}");
                }
            }
        }
        Command::Dashboard => {
            let stats = api.dashboard().await?;
            if json {
                print_json(&stats)?;
            } else {
                println!("Total leads:           {}", stats.total_leads);
                println!("New today:             {}", stats.today_leads);
                println!("Admin users:           {}", stats.total_users);
                println!("Pending testimonials:  {}", stats.pending_testimonials);
                if !stats.recent_leads.is_empty() {
                    println!();
                    println!("Recent leads:");
                    for lead in &stats.recent_leads {
                        println!(
                            "  {}  {:<24} {:<13} {}",
                            lead.id,
                            lead.full_name,
                            lead.status,
                            lead.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
        }
        Command::Leads(command) => run_leads(api, command, json).await?,
        Command::Users(command) => run_users(api, command, json).await?,
        Command::Testimonials(command) => run_testimonials(api, command, json).await?,
    }
    Ok(())
}

async fn run_leads(api: &AdminApi, command: LeadsCommand, json: bool) -> Result<(), CliError> {
    match command {
        LeadsCommand::List { sort, page } => {
            let mut leads = api.leads().list().await?;
            listing::sort_by_created(&mut leads, sort);
            let page = listing::paginate(&leads, page, DEFAULT_PER_PAGE);

            if json {
                return print_json(&page.items);
            }
            for lead in page.items {
                println!(
                    "{}  {:<24} {:<14} RM {:>10.2}  {:<13} {}",
                    lead.id,
                    lead.full_name,
                    lead.phone,
                    lead.loan_amount,
                    lead.status,
                    lead.created_at.format("%Y-%m-%d")
                );
            }
            println!(
                "Page {} of {} ({} leads)",
                page.page,
                page.total_pages.max(1),
                page.total_items
            );
        }
        LeadsCommand::Status { id, status } => {
            api.leads().update_status(&id, status).await?;
            println!("Lead {id} is now {status}");
        }
        LeadsCommand::Assign { id, user } => {
            api.leads().assign(&id, user.as_deref()).await?;
            match user {
                Some(user) => println!("Lead {id} assigned to {user}"),
                None => println!("Lead {id} unassigned"),
            }
        }
    }
    Ok(())
}

async fn run_users(api: &AdminApi, command: UsersCommand, json: bool) -> Result<(), CliError> {
    match command {
        UsersCommand::List => {
            let users = api.users().list().await?;
            if json {
                return print_json(&users);
            }
            for user in &users {
                println!(
                    "{}  {:<20} {:<10} {}",
                    user.id,
                    user.username,
                    user.role,
                    user.email.as_deref().unwrap_or("-")
                );
            }
        }
        UsersCommand::Create {
            username,
            email,
            password,
            role,
        } => {
            let password = password.unwrap_or_default();
            check(&[
                ("username", rules::username(), Some(username.as_str())),
                ("email", optional(rules::email()), email.as_deref()),
                ("password", rules::password(), Some(password.as_str())),
            ])?;
            warn_weak(&password);

            let user = api
                .users()
                .create(&NewUser {
                    username,
                    email,
                    password,
                    role,
                })
                .await?;
            println!("Created user {} ({})", user.username, user.id);
        }
        UsersCommand::Update {
            id,
            role,
            email,
            password,
        } => {
            check(&[
                ("email", optional(rules::email()), email.as_deref()),
                ("password", optional(rules::password()), password.as_deref()),
            ])?;
            if let Some(password) = &password {
                warn_weak(password);
            }

            let user = api
                .users()
                .update(
                    &id,
                    &UserUpdate {
                        role,
                        email,
                        password,
                    },
                )
                .await?;
            println!("Updated user {} ({})", user.username, user.role);
        }
        UsersCommand::Delete { id } => {
            api.users().delete(&id).await?;
            println!("Deleted user {id}");
        }
    }
    Ok(())
}

async fn run_testimonials(
    api: &AdminApi,
    command: TestimonialsCommand,
    json: bool,
) -> Result<(), CliError> {
    match command {
        TestimonialsCommand::List { filter } => {
            let all = api.testimonials().moderation_queue().await?;
            let mut shown = listing::filter_testimonials(&all, filter);
            listing::sort_for_moderation(&mut shown);

            if json {
                return print_json(&shown);
            }
            for t in &shown {
                println!(
                    "{}  {:<20} {}/5  {:<9} {}",
                    t.id,
                    t.name,
                    t.rating,
                    t.status,
                    validation::single_line(&t.message)
                );
            }
            let (pending, approved, rejected) = listing::testimonial_counts(&all);
            println!("{pending} pending, {approved} approved, {rejected} rejected");
        }
        TestimonialsCommand::Approve { id } => {
            let t = api.testimonials().approve(&id).await?;
            report_moderation(&t.id, t.status);
        }
        TestimonialsCommand::Reject { id } => {
            let t = api.testimonials().reject(&id).await?;
            report_moderation(&t.id, t.status);
        }
        TestimonialsCommand::Delete { id } => {
            api.testimonials().delete(&id).await?;
            println!("Deleted testimonial {id}");
        }
    }
    Ok(())
}

fn report_moderation(id: &str, status: TestimonialStatus) {
    println!("Testimonial {id} is now {status}");
}

/// The same rule, but an absent value passes.
fn optional(rule: FieldRule) -> FieldRule {
    FieldRule {
        required: false,
        ..rule
    }
}

fn check(fields: &[(&str, FieldRule, Option<&str>)]) -> Result<(), FormErrors> {
    let rules: Vec<(&str, FieldRule)> = fields
        .iter()
        .map(|(name, rule, _)| (*name, rule.clone()))
        .collect();
    let errors = validation::validate_form(
        |field| {
            fields
                .iter()
                .find(|(name, _, _)| *name == field)
                .and_then(|(_, _, value)| *value)
        },
        &rules,
    );
    if errors.is_valid() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn warn_weak(password: &str) {
    let report = validation::password_strength(password);
    if !report.is_valid() {
        eprintln!("warning: {} password", report.strength);
        for issue in &report.issues {
            eprintln!("  - {issue}");
        }
    }
}

fn prompt(label: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Townsquare CLI - command-line access to the community service.
//!
//! Each invocation runs one command against the configured API and prints
//! the result as JSON. The session token persists between invocations.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use townsquare_core::models::{EventDraft, Registration};
use townsquare_core::{Config, ImageUpload, Townsquare};

/// Directory for daily log files; unset means stderr only
const LOG_DIR_ENV: &str = "TOWNSQUARE_LOG_DIR";

/// Log file prefix inside the log directory
const LOG_FILE_PREFIX: &str = "townsquare.log";

const USAGE: &str = "\
Usage: townsquare <command> [args]

Session:
  login [email]                    Log in (password is prompted)
  logout                           Forget the stored token
  register                         Create an account (fields are prompted)
  request-reset <email>            Send a password reset OTP
  verify-otp <email> <otp>         Verify a password reset OTP
  whoami                           Show the logged-in profile

Events:
  events                           List events
  event <id>                       Show one event
  event-like <id>                  Like an event
  event-join <id>                  Join an event
  event-cancel <id>                Cancel participation
  event-delete <id>                Delete one of your events
  my-events                        List events you created
  event-create <json-file> [image] Create an event
  event-update <id> <json-file> [image]

Forums:
  forums                           List forum posts
  forum <id>                       Show a post with its comments
  forum-create <title> <content> [image]
  forum-like <id>                  Like a post
  comment <id> <text>              Comment on a post

  notifications                    List your notifications

Environment: TOWNSQUARE_API_URL, TOWNSQUARE_CREDENTIAL_BACKEND (file|keyring),
TOWNSQUARE_LOG_DIR, RUST_LOG";

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes the file writer and must outlive `main`'s work.
fn init_tracing() -> Option<WorkerGuard> {
    // RUST_LOG controls the level (e.g., RUST_LOG=townsquare_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "-h" | "--help" | "help") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Login { email: Option<String> },
    Logout,
    Register,
    RequestReset { email: String },
    VerifyOtp { email: String, otp: String },
    WhoAmI,
    Events,
    Event { id: String },
    EventLike { id: String },
    EventJoin { id: String },
    EventCancel { id: String },
    EventDelete { id: String },
    MyEvents,
    EventCreate { draft: String, image: Option<String> },
    EventUpdate { id: String, draft: String, image: Option<String> },
    Forums,
    Forum { id: String },
    ForumCreate { title: String, content: String, image: Option<String> },
    ForumLike { id: String },
    Comment { id: String, text: String },
    Notifications,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            bail!("Missing command\n\n{}", USAGE);
        };

        let command = match (name.as_str(), rest) {
            // --- session ---
            ("login", []) => Command::Login { email: None },
            ("login", [email]) => Command::Login { email: Some(email.clone()) },
            ("logout", []) => Command::Logout,
            ("register", []) => Command::Register,
            ("request-reset", [email]) => Command::RequestReset { email: email.clone() },
            ("verify-otp", [email, otp]) => Command::VerifyOtp {
                email: email.clone(),
                otp: otp.clone(),
            },
            ("whoami", []) => Command::WhoAmI,

            // --- events ---
            ("events", []) => Command::Events,
            ("event", [id]) => Command::Event { id: id.clone() },
            ("event-like", [id]) => Command::EventLike { id: id.clone() },
            ("event-join", [id]) => Command::EventJoin { id: id.clone() },
            ("event-cancel", [id]) => Command::EventCancel { id: id.clone() },
            ("event-delete", [id]) => Command::EventDelete { id: id.clone() },
            ("my-events", []) => Command::MyEvents,
            ("event-create", [draft, image @ ..]) if image.len() <= 1 => Command::EventCreate {
                draft: draft.clone(),
                image: image.first().cloned(),
            },
            ("event-update", [id, draft, image @ ..]) if image.len() <= 1 => Command::EventUpdate {
                id: id.clone(),
                draft: draft.clone(),
                image: image.first().cloned(),
            },

            // --- forums ---
            ("forums", []) => Command::Forums,
            ("forum", [id]) => Command::Forum { id: id.clone() },
            ("forum-create", [title, content, image @ ..]) if image.len() <= 1 => {
                Command::ForumCreate {
                    title: title.clone(),
                    content: content.clone(),
                    image: image.first().cloned(),
                }
            }
            ("forum-like", [id]) => Command::ForumLike { id: id.clone() },
            ("comment", [id, text]) => Command::Comment {
                id: id.clone(),
                text: text.clone(),
            },

            ("notifications", []) => Command::Notifications,

            (command, _) => bail!("Unknown command or wrong arguments: {}\n\n{}", command, USAGE),
        };
        Ok(command)
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Register => "register",
            Command::RequestReset { .. } => "request-reset",
            Command::VerifyOtp { .. } => "verify-otp",
            Command::WhoAmI => "whoami",
            Command::Events => "events",
            Command::Event { .. } => "event",
            Command::EventLike { .. } => "event-like",
            Command::EventJoin { .. } => "event-join",
            Command::EventCancel { .. } => "event-cancel",
            Command::EventDelete { .. } => "event-delete",
            Command::MyEvents => "my-events",
            Command::EventCreate { .. } => "event-create",
            Command::EventUpdate { .. } => "event-update",
            Command::Forums => "forums",
            Command::Forum { .. } => "forum",
            Command::ForumCreate { .. } => "forum-create",
            Command::ForumLike { .. } => "forum-like",
            Command::Comment { .. } => "comment",
            Command::Notifications => "notifications",
        }
    }
}

async fn run(args: &[String]) -> Result<()> {
    // bad arguments fail before any config or credential access
    let command = Command::parse(args)?;
    let config = Config::load()?;
    let client = Townsquare::from_config(&config).await?;
    info!(command = command.name(), "Running command");

    match command {
        Command::Login { email } => {
            let email = match email.or_else(|| config.last_email.clone()) {
                Some(email) => email,
                None => prompt("Email")?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            let response = client.auth().login(&email, &password).await?;
            Config::remember_email(&email)?;
            print_json(&response)
        }
        Command::Logout => {
            client.auth().logout().await?;
            eprintln!("Logged out.");
            Ok(())
        }
        Command::Register => {
            let registration = Registration {
                full_name: prompt("Full name")?,
                email: prompt("Email")?,
                password: rpassword::prompt_password("Password: ")?,
                phone: prompt("Phone")?,
                address: prompt("Address")?,
            };
            print_json(&client.auth().register(&registration).await?)
        }
        Command::RequestReset { email } => {
            print_json(&client.auth().request_password_reset(&email).await?)
        }
        Command::VerifyOtp { email, otp } => {
            print_json(&client.auth().verify_otp(&email, &otp).await?)
        }
        Command::WhoAmI => print_json(&client.profile().get_self().await?),

        Command::Events => print_json(&client.events().list().await?),
        Command::Event { id } => print_json(&client.events().get_by_id(&id).await?),
        Command::EventLike { id } => {
            let likes = client.events().like(&id).await?;
            print_json(&serde_json::json!({ "likes": likes }))
        }
        Command::EventJoin { id } => print_json(&client.events().join(&id).await?),
        Command::EventCancel { id } => print_json(&client.events().cancel(&id).await?),
        Command::EventDelete { id } => {
            client.events().delete(&id).await?;
            eprintln!("Event {} deleted.", id);
            Ok(())
        }
        Command::MyEvents => print_json(&client.events().my_events().await?),
        Command::EventCreate { draft, image } => {
            let draft = read_draft(&draft).await?;
            let image = read_image(image.as_deref()).await?;
            print_json(&client.events().create(&draft, image).await?)
        }
        Command::EventUpdate { id, draft, image } => {
            let draft = read_draft(&draft).await?;
            let image = read_image(image.as_deref()).await?;
            print_json(&client.events().update(&id, &draft, image).await?)
        }

        Command::Forums => print_json(&client.forums().list().await?),
        Command::Forum { id } => print_json(&client.forums().get_by_id(&id).await?),
        Command::ForumCreate { title, content, image } => {
            let image = read_image(image.as_deref()).await?;
            print_json(&client.forums().create(&title, &content, image).await?)
        }
        Command::ForumLike { id } => {
            let likes = client.forums().like(&id).await?;
            print_json(&serde_json::json!({ "likes": likes }))
        }
        Command::Comment { id, text } => {
            print_json(&client.forums().add_comment(&id, &text).await?)
        }

        Command::Notifications => print_json(&client.notifications().list_for_user().await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn read_draft(path: &str) -> Result<EventDraft> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read event file {}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse event file {}", path))
}

async fn read_image(path: Option<&str>) -> Result<Option<ImageUpload>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let image = ImageUpload::from_path(Path::new(path))
        .await
        .with_context(|| format!("Failed to read image {}", path))?;
    Ok(Some(image))
}

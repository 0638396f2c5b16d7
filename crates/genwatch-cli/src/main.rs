//! # Genwatch CLI
//!
//! One-shot commands against a generator controller: read the status feed
//! or settings pages, press an action, change a setting.

use anyhow::{Context, Result};
use genwatch_adapter_http::auth::DEFAULT_PASSWORD;
use genwatch_adapter_http::{
    authorization_header, decode_credentials, CommandSender, HttpTransport, TransportConfig,
};
use genwatch_core::{Action, Setting};
use genwatch_entities::{Button, Select};
use genwatch_poller::Coordinator;
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "status" => {
            let coordinator = Coordinator::status(transport()?);
            let snapshot = coordinator.refresh().await?;
            println!("{}", serde_json::to_string_pretty(&*snapshot)?);
        }
        "settings" => {
            let coordinator = Coordinator::settings(transport()?);
            let snapshot = coordinator.refresh().await?;
            println!("{}", serde_json::to_string_pretty(&*snapshot)?);
        }
        "press" => {
            if args.len() < 3 {
                eprintln!("Usage: genwatch press <action>");
                std::process::exit(1);
            }
            let action = Action::from_key(&args[2])
                .ok_or_else(|| CommandError::UnknownAction(args[2].clone()))?;

            let transport = transport()?;
            let button = Button::new(
                action,
                CommandSender::new(transport.clone()),
                Coordinator::status(transport),
            );
            if !button.press().await {
                eprintln!("Controller rejected {}", action.key());
                std::process::exit(1);
            }
            println!("{}", action.command());
        }
        "select" => {
            if args.len() < 4 {
                eprintln!("Usage: genwatch select <setting> <option>");
                std::process::exit(1);
            }
            let setting = Setting::from_key(&args[2])
                .ok_or_else(|| CommandError::UnknownSetting(args[2].clone()))?;

            let transport = transport()?;
            let select = Select::new(
                setting,
                Coordinator::settings(transport.clone()),
                CommandSender::new(transport),
            );
            if !select.select_option(&args[3]).await? {
                eprintln!("Controller rejected {} = {}", setting.key(), args[3]);
                std::process::exit(1);
            }
            let current = select.current_option();
            println!("{}", current.as_deref().unwrap_or("unknown"));
        }
        "auth" => {
            let password = args.get(2).map_or(DEFAULT_PASSWORD, String::as_str);
            println!("{}", authorization_header(password));
        }
        "auth-decode" => {
            if args.len() < 3 {
                eprintln!("Usage: genwatch auth-decode <header>");
                std::process::exit(1);
            }
            println!("{}", describe_credentials(&args[2])?);
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Transport to the controller named by `GENWATCH_HOST`.
fn transport() -> Result<Arc<HttpTransport>> {
    let host = env::var("GENWATCH_HOST").context("GENWATCH_HOST is required")?;
    let password = env::var("GENWATCH_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());

    let transport = HttpTransport::new(&TransportConfig {
        host,
        password,
        timeout: None,
    })?;
    Ok(Arc::new(transport))
}

/// `user:password` carried by an `Authorization` header value.
fn describe_credentials(header: &str) -> Result<String> {
    let (user, password) = decode_credentials(header).context("Failed to decode")?;
    Ok(format!("{user}:{password}"))
}

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error("unknown action {0:?} (expected one of: start, stop, enable_standby, disable_standby, exercise_now)")]
    UnknownAction(String),
    #[error("unknown setting {0:?} (expected one of: load_mode, load_1, load_2, exercise_frequency, exercise_day, exercise_hour, exercise_minute)")]
    UnknownSetting(String),
}

fn print_help() {
    println!(
        r#"Genwatch CLI

USAGE:
    genwatch <COMMAND> [OPTIONS]

COMMANDS:
    status                     Fetch and print the parsed status feed
    settings                   Fetch and print load and exercise settings
    press <action>             Send an action (start, stop, enable_standby,
                               disable_standby, exercise_now)
    select <setting> <option>  Change a setting
    auth [password]            Print the Authorization header value
    auth-decode <header>       Decode an Authorization header value
    help                       Show this help message

ENVIRONMENT:
    GENWATCH_HOST              Controller host or host:port (required)
    GENWATCH_PASSWORD          Password of the admin account (default: cummins)

EXAMPLES:
    genwatch status
    genwatch press exercise_now
    genwatch select exercise_day Saturday
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_printed_header() {
        let header = authorization_header(DEFAULT_PASSWORD);
        assert_eq!(describe_credentials(&header).unwrap(), "admin:cummins");
        assert_eq!(
            describe_credentials("YWRtaW46aHVudGVyMg==").unwrap(),
            "admin:hunter2"
        );
    }

    #[test]
    fn rejects_garbage_header() {
        assert!(describe_credentials("Basic !!!").is_err());
        assert!(describe_credentials("Basic bm9jb2xvbg==").is_err());
    }
}

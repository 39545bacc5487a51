//! Sentinel Panel CLI
//!
//! Command-line front end for Sentinel user and organization management.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentinel_panel::identity::{NewOrg, NewUser};
use sentinel_panel::{load_config, Config, PanelBuilder, PanelError, SentinelController};
use serde_json::Value;
use tracing::Level;

#[derive(Parser)]
#[command(name = "sentinel-panel")]
#[command(about = "Sentinel user and organization management panel")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// User to log in as (overrides config file)
    #[arg(short, long)]
    username: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all users
    ListUsers,
    /// Show a single user
    ShowUser { user_id: String },
    /// Create a user
    CreateUser {
        new_username: String,
        /// Password for the new user; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        /// Extra profile field, as NAME=VALUE (VALUE may be JSON)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// List all organizations
    ListOrgs,
    /// Create an organization
    CreateOrg {
        name: String,
        /// Extra field, as NAME=VALUE (VALUE may be JSON)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Show the logged-in user's own record
    Whoami,
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", raw))?;
    if name.is_empty() {
        return Err(format!("empty field name in {:?}", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Ask for the new user's password when it was not given on the command line
fn prompt_missing_password<F>(command: Command, prompt: F) -> std::io::Result<Command>
where
    F: FnOnce(String) -> std::io::Result<String>,
{
    match command {
        Command::CreateUser {
            new_username,
            password: None,
            fields,
        } => {
            let password = prompt(format!("Password for new user {}: ", new_username))?;
            Ok(Command::CreateUser {
                new_username,
                password: Some(password),
                fields,
            })
        }
        other => Ok(other),
    }
}

async fn run_command(controller: &mut SentinelController, command: Command) -> Value {
    match command {
        Command::ListUsers => {
            controller.get_users().await;
            Value::from(controller.view().users.clone())
        }
        Command::ShowUser { user_id } => {
            controller.get_user(&user_id).await;
            serde_json::to_value(&controller.view().user_data).unwrap_or_default()
        }
        Command::CreateUser {
            new_username,
            password,
            fields,
        } => {
            let user = NewUser::new(new_username, password.unwrap_or_default());
            let user = fields
                .into_iter()
                .fold(user, |user, (k, v)| user.with_field(k, v));
            controller.create_user(&user).await;
            serde_json::json!({ "message": controller.view().user_msg })
        }
        Command::ListOrgs => {
            controller.get_orgs().await;
            serde_json::to_value(&controller.view().orgs).unwrap_or_default()
        }
        Command::CreateOrg { name, fields } => {
            let org = fields
                .into_iter()
                .fold(NewOrg::new(name), |org, (k, v)| org.with_field(k, v));
            controller.create_org(&org).await;
            serde_json::to_value(&controller.view().org_data).unwrap_or_default()
        }
        Command::Whoami => {
            controller.get_signed_user_acct().await;
            serde_json::to_value(&controller.view().user_data).unwrap_or_default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, base_url={:?}, username={:?}, command={:?}",
        args.config,
        args.base_url,
        args.username,
        args.command
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets()?;

    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    if let Some(username) = args.username {
        config.credentials.username = Some(username);
    }

    let username = config.credentials.username.clone().ok_or_else(|| {
        PanelError::Config("no username: pass --username or set credentials.username".to_string())
    })?;
    let password = match config.credentials.password.clone() {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {}: ", username))?,
    };

    let command = prompt_missing_password(args.command, |prompt| {
        rpassword::prompt_password(prompt)
    })?;

    let panel = PanelBuilder::new(config).build()?;
    let mut controller = panel.controller().await;

    controller.set_credentials(username, password);
    controller.login().await;
    if !controller.authenticated().await {
        let msg = controller.view().err_msg.clone().unwrap_or_default();
        eprintln!("{}", msg);
        return Ok(ExitCode::FAILURE);
    }

    let output = run_command(&mut controller, command).await;

    if let Some(err_msg) = &controller.view().err_msg {
        eprintln!("{}", err_msg);
        return Ok(ExitCode::FAILURE);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    tracing::debug!("Finished at route {}", controller.route());
    Ok(ExitCode::SUCCESS)
}

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{UserApi, UserApiClient};
use shared::{
    domain::UserId,
    protocol::{UserDraft, UserListResponse},
    view::{render_text, render_users, UserCard},
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "users", about = "Manage users on a remote user-management API")]
struct Cli {
    /// Overrides the configured user collection URL.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// TOML settings file; defaults to ./user_console.toml or the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print raw JSON instead of rendered cards.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct UserFields {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: Option<String>,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
}

impl UserFields {
    fn into_draft(self) -> Result<UserDraft> {
        let draft = UserDraft::from_form(
            &self.username,
            &self.email,
            self.password.as_deref().unwrap_or_default(),
            &self.first_name,
            &self.last_name,
        );
        let missing = draft.missing_required();
        if !missing.is_empty() {
            bail!("{} must not be empty", missing.join(" and "));
        }
        Ok(draft)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every user as cards.
    List,
    Create {
        #[command(flatten)]
        fields: UserFields,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings =
        shared::config::load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(api_base_url) = cli.api_base_url {
        settings.api_base_url = api_base_url;
    }
    let client = UserApiClient::with_timeout(
        &settings.api_base_url,
        settings.request_timeout_secs.map(Duration::from_secs),
    )?;
    debug!(base_url = %client.base_url(), "using user api");

    let command = cli.command.name();
    debug!(command, "dispatching command");
    if let Err(err) = run(&client, cli.command, cli.json).await {
        warn!(command, "command failed: {err:#}");
        return Err(err);
    }
    Ok(())
}

async fn run(client: &UserApiClient, command: Command, json: bool) -> Result<()> {
    match command {
        Command::List => {
            let response = client.list().await.context("failed to load users")?;
            print_list(&response, json)?;
        }
        Command::Create { fields } => {
            let record = client
                .create(&fields.into_draft()?)
                .await
                .context("failed to create user")?;
            print_card(UserCard::new(record), json)?;
            eprintln!("User created successfully!");
        }
        Command::Update { id, fields } => {
            let user_id = UserId::from_input(&id);
            let record = client
                .update(&user_id, &fields.into_draft()?)
                .await
                .context("failed to update user")?;
            print_card(UserCard::new(record), json)?;
            eprintln!("User updated successfully!");
        }
        Command::Delete { id, yes } => {
            let user_id = UserId::from_input(&id);
            if !yes && !prompt_confirmation(&user_id)? {
                debug!(%user_id, "delete not confirmed; no request sent");
                eprintln!("Aborted.");
                return Ok(());
            }
            client
                .delete(&user_id)
                .await
                .context("failed to delete user")?;
            eprintln!("User deleted successfully!");
        }
    }

    Ok(())
}

fn print_list(response: &UserListResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        print!("{}", render_text(&render_users(response)));
    }
    Ok(())
}

fn print_card(card: UserCard, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&card.record)?);
    } else {
        print!(
            "{}",
            render_text(&shared::view::ListViewState::Cards(vec![card]))
        );
    }
    Ok(())
}

fn prompt_confirmation(user_id: &UserId) -> Result<bool> {
    eprint!("Are you sure you want to delete user {user_id}? [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
    }

    #[test]
    fn fields_require_username_and_email() {
        let fields = UserFields {
            username: " ".into(),
            email: "a@example.com".into(),
            password: None,
            first_name: String::new(),
            last_name: String::new(),
        };
        let err = fields.into_draft().expect_err("missing username");
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn parses_update_with_optional_password() {
        let cli = Cli::try_parse_from([
            "users",
            "update",
            "42",
            "--username",
            "ada",
            "--email",
            "ada@example.com",
        ])
        .expect("parse");
        match cli.command {
            Command::Update { id, fields } => {
                assert_eq!(id, "42");
                let draft = fields.into_draft().expect("draft");
                assert_eq!(draft.password, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn numeric_looking_ids_are_passed_through_verbatim() {
        let cli = Cli::try_parse_from(["users", "delete", "007", "--yes"]).expect("parse");
        assert_eq!(cli.command.name(), "delete");
        match cli.command {
            Command::Delete { id, yes } => {
                assert!(yes);
                assert_eq!(UserId::from_input(&id).to_string(), "007");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn delete_requires_an_id() {
        assert!(Cli::try_parse_from(["users", "delete"]).is_err());
    }
}

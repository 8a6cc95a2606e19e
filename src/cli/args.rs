//! Clap argument types.

use clap::{ArgAction, Parser};

use usersync::config::Overrides;
use usersync::models::{Gender, StoreMode, UserDraft, UserId};
use usersync::output::OutputFormat;

/// Manage user records, synced to a REST collection.
#[derive(Parser, Debug)]
#[command(name = "usersync", version = usersync::constants::VERSION)]
pub struct Cli {
    /// Base URL of the remote API (the collection is `{base}/users`).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// remote: sync every change; local: fetch the list, keep changes in
    /// memory; offline: no network.
    #[arg(long, global = true)]
    pub mode: Option<StoreMode>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Output format for listings.
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Flags that override loaded configuration.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            mode: self.mode,
            format: self.format,
        }
    }
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Fetch and list all users.
    List,

    /// Create a user.
    Create(CreateArgs),

    /// Update fields of an existing user.
    Update(UpdateArgs),

    /// Delete a user.
    Delete(DeleteArgs),

    /// Start an interactive shell.
    Shell,

    /// Print the resolved configuration.
    Config,

    /// Print version and build information.
    Version,
}

/// Arguments for the `create` subcommand.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub website: String,

    /// Defaults to `records.default_gender` from config.
    #[arg(long, value_enum)]
    pub gender: Option<Gender>,
}

impl CreateArgs {
    pub fn into_draft(self, default_gender: Gender) -> UserDraft {
        UserDraft {
            name: self.name,
            username: self.username,
            email: self.email,
            phone: self.phone,
            website: self.website,
            gender: self.gender.unwrap_or(default_gender),
        }
    }
}

/// Arguments for the `update` subcommand. Omitted fields keep their value.
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Id of the user to update.
    pub id: UserId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    #[arg(long, value_enum)]
    pub gender: Option<Gender>,
}

impl UpdateArgs {
    /// Write the given fields into `draft`.
    pub fn apply(&self, draft: &mut UserDraft) {
        let text_fields = [
            (&self.name, &mut draft.name),
            (&self.username, &mut draft.username),
            (&self.email, &mut draft.email),
            (&self.phone, &mut draft.phone),
            (&self.website, &mut draft.website),
        ];
        for (given, slot) in text_fields {
            if let Some(value) = given {
                *slot = value.clone();
            }
        }
        if let Some(gender) = self.gender {
            draft.gender = gender;
        }
    }

    /// Whether any field flag was given.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.website.is_none()
            && self.gender.is_none()
    }
}

/// Arguments for the `delete` subcommand.
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Id of the user to delete.
    pub id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "usersync", "list", "--mode", "offline", "--format", "json", "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::List));
        let overrides = cli.overrides();
        assert_eq!(overrides.mode, Some(StoreMode::Offline));
        assert_eq!(overrides.format, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["usersync", "--timeout", "0", "list"]).is_err());
    }

    #[test]
    fn create_requires_core_fields() {
        assert!(Cli::try_parse_from(["usersync", "create", "--name", "Ann"]).is_err());

        let cli = Cli::try_parse_from([
            "usersync", "create", "--name", "Ann", "--username", "ann1", "--email", "ann@x.com",
            "--gender", "female",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let draft = args.into_draft(Gender::Male);
        assert_eq!(draft.gender, Gender::Female);
        assert_eq!(draft.phone, "");
    }

    #[test]
    fn update_applies_only_given_fields() {
        let cli = Cli::try_parse_from(["usersync", "update", "2", "--name", "Bea"]).unwrap();
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.id, UserId::Int(2));
        assert!(!args.is_empty());

        let mut draft = UserDraft::new("Bob", "bob", "bob@x.com");
        args.apply(&mut draft);
        assert_eq!(draft.name, "Bea");
        assert_eq!(draft.username, "bob");
    }

    #[test]
    fn invalid_mode_is_rejected() {
        assert!(Cli::try_parse_from(["usersync", "--mode", "cloud", "list"]).is_err());
    }
}

//! Shell command parsing.

use thiserror::Error;

use crate::models::{Field, UserId};

/// Help text for the interactive shell.
pub const HELP: &str = "\
Commands:
  ls | list                  show all users
  refresh                    reload users from the remote collection
  add k=v ...                create a user (name, username, email required)
  edit <id>                  start editing a user
  set k=v ...                change fields of the user being edited
  show                       show the user being edited
  save                       commit the edit
  cancel                     discard the edit
  rm | delete <id>           delete a user
  help                       show this help
  quit | exit                leave the shell

Fields: name, username, email, phone, website, gender (male|female).
Quote values containing spaces: add name='Leanne Graham' ...";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Add(Vec<(Field, String)>),
    Edit(UserId),
    Set(Vec<(Field, String)>),
    Show,
    Save,
    Cancel,
    Delete(UserId),
    Help,
    Quit,
}

/// Errors parsing or applying a shell command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("could not split input: {0}")]
    Split(String),

    #[error("unknown command '{0}' (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("`{command}` takes no arguments")]
    UnexpectedArgument { command: &'static str },

    #[error("expected field=value, got '{0}'")]
    BadAssignment(String),

    #[error("{0}")]
    BadField(String),

    #[error("{0}")]
    BadValue(String),

    #[error("invalid id: {0}")]
    BadId(String),

    #[error("no edit in progress (use `edit <id>` first)")]
    NotEditing,
}

/// Parse one line. Returns `Ok(None)` for blank input.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let words = shell_words::split(line).map_err(|e| CommandError::Split(e.to_string()))?;
    let Some((head, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "ls" | "list" => no_args("list", args, Command::List)?,
        "refresh" => no_args("refresh", args, Command::Refresh)?,
        "show" => no_args("show", args, Command::Show)?,
        "save" => no_args("save", args, Command::Save)?,
        "cancel" => no_args("cancel", args, Command::Cancel)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "add" => Command::Add(assignments("add", args)?),
        "set" => Command::Set(assignments("set", args)?),
        "edit" => Command::Edit(single_id("edit", args)?),
        "rm" | "delete" => Command::Delete(single_id("delete", args)?),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn no_args(command: &'static str, args: &[String], parsed: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::UnexpectedArgument { command })
    }
}

fn single_id(command: &'static str, args: &[String]) -> Result<UserId, CommandError> {
    match args {
        [] => Err(CommandError::MissingArgument {
            command,
            what: "a user id",
        }),
        [raw] => raw.parse().map_err(CommandError::BadId),
        _ => Err(CommandError::BadId(args.join(" "))),
    }
}

fn assignments(command: &'static str, args: &[String]) -> Result<Vec<(Field, String)>, CommandError> {
    if args.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "at least one field=value",
        });
    }
    args.iter()
        .map(|arg| {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| CommandError::BadAssignment(arg.clone()))?;
            let field = key.trim().parse::<Field>().map_err(CommandError::BadField)?;
            Ok((field, value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_parse_to_none() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("ls").unwrap(), Some(Command::List));
        assert_eq!(parse_command("LIST").unwrap(), Some(Command::List));
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("save").unwrap(), Some(Command::Save));
    }

    #[test]
    fn add_with_quoted_values() {
        let parsed = parse_command(r#"add name="Leanne Graham" username=Bret email=a@b.c"#).unwrap();
        assert_eq!(
            parsed,
            Some(Command::Add(vec![
                (Field::Name, "Leanne Graham".to_string()),
                (Field::Username, "Bret".to_string()),
                (Field::Email, "a@b.c".to_string()),
            ]))
        );
    }

    #[test]
    fn value_may_contain_equals_or_be_empty() {
        let parsed = parse_command("set website=https://x.io/?a=b phone=").unwrap();
        assert_eq!(
            parsed,
            Some(Command::Set(vec![
                (Field::Website, "https://x.io/?a=b".to_string()),
                (Field::Phone, String::new()),
            ]))
        );
    }

    #[test]
    fn ids_parse_as_int_or_text() {
        assert_eq!(parse_command("edit 3").unwrap(), Some(Command::Edit(UserId::Int(3))));
        assert_eq!(
            parse_command("rm abc").unwrap(),
            Some(Command::Delete(UserId::Text("abc".into())))
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(parse_command("frobnicate"), Err(CommandError::Unknown(_))));
        assert!(matches!(
            parse_command("edit"),
            Err(CommandError::MissingArgument { command: "edit", .. })
        ));
        assert!(matches!(parse_command("rm 1 2"), Err(CommandError::BadId(_))));
        assert!(matches!(parse_command("add name"), Err(CommandError::BadAssignment(_))));
        assert!(matches!(parse_command("add city=Paris"), Err(CommandError::BadField(_))));
        assert!(matches!(parse_command("add"), Err(CommandError::MissingArgument { .. })));
        assert!(matches!(
            parse_command("ls now"),
            Err(CommandError::UnexpectedArgument { command: "list" })
        ));
        assert!(matches!(parse_command("add name='open"), Err(CommandError::Split(_))));
    }
}

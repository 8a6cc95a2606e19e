//! Terminal renderer: one aligned row per user with a tinted avatar.

use colored::Colorize;

use crate::avatar::{avatar_color, initials};
use crate::models::UserRecord;
use crate::output::OutputRenderer;

const HEADERS: [&str; 8] = ["", "Name", "Username", "Email", "Phone", "Website", "Gender", "ID"];

/// Terminal output renderer.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, users: &[UserRecord]) -> String {
        if users.is_empty() {
            return format!(
                "  {}\n",
                "No users found. Add a new user to get started.".dimmed()
            );
        }

        let rows: Vec<[String; 8]> = users.iter().map(row).collect();

        let mut widths = HEADERS.map(str::len);
        for cells in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();

        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| pad(h, w))
            .collect();
        output.push_str(&format!(" {}\n", header.join("  ").bold()));

        for (user, cells) in users.iter().zip(&rows) {
            let color = avatar_color(&user.name).to_colored();
            let mut line = Vec::with_capacity(cells.len());
            for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
                let padded = pad(cell, width);
                line.push(match i {
                    0 => padded.color(color).bold().to_string(),
                    1 => padded.bold().to_string(),
                    7 => padded.dimmed().to_string(),
                    _ => padded,
                });
            }
            output.push_str(&format!(" {}\n", line.join("  ")));
        }

        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} {}\n",
            users.len().to_string().bold(),
            if users.len() == 1 { "user" } else { "users" },
        ));

        output
    }
}

fn row(user: &UserRecord) -> [String; 8] {
    [
        initials(&user.name),
        user.name.clone(),
        user.username.clone(),
        user.email.clone(),
        user.phone.clone(),
        user.website.clone(),
        user.gender.to_string(),
        user.id.to_string(),
    ]
}

/// Left-align `text` in `width` columns, counting chars rather than bytes.
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = text.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    out
}

//! Help text rendering for command bundles.

use super::bundle::Bundle;
use super::definitions::Command;
use crate::session::OutputStream;
use std::collections::HashSet;
use std::io;

const INDENT: &str = "    ";

/// Renders the listing of every bundle that has commands to show.
///
/// Each bundle gets a `=== description` heading followed by its commands,
/// names padded to the longest name in that bundle. A name already defined
/// by an earlier bundle is left out, since lookups never reach it.
pub fn format_listing(bundles: &[Bundle]) -> String {
    let mut text = String::new();
    let mut seen = HashSet::new();
    for bundle in bundles {
        let visible: Vec<_> = bundle
            .commands()
            .filter(|(name, _)| !seen.contains(name))
            .collect();
        seen.extend(bundle.commands().map(|(name, _)| name));
        if visible.is_empty() {
            continue;
        }

        text.push_str(&format!("=== {}\n\n", bundle.description()));
        let width = visible.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
        for (name, command) in visible {
            text.push_str(&format!("  {name:<width$}  {}\n", command.summary()));
        }
        text.push('\n');
    }
    text
}

/// Renders the detailed help of one command.
pub fn format_details(name: &str, command: &dyn Command) -> String {
    let usage = match command.usage() {
        Some(usage) => format!("{name} {usage}"),
        None => name.to_string(),
    };
    format!(
        "Summary:\n{}\nUsage:\n{}\nDescription:\n{}\n",
        indent(command.summary()),
        indent(&usage),
        indent(command.detail())
    )
}

/// Prints the bundle listing to `out`.
pub fn list_commands(out: &OutputStream, bundles: &[Bundle]) -> io::Result<()> {
    out.write_str(&format_listing(bundles))
}

fn indent(text: &str) -> String {
    text.trim()
        .lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

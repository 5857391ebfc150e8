//! Command parsing, lookup and dispatch.
//!
//! Raw text goes through the [`parser`], the first word is looked up in a
//! [`CommandRegistry`] and the resulting [`ResolvedBinding`] runs against a
//! [`CommandContext`].

pub mod bundle;
pub mod definitions;
pub mod handlers;
pub mod help;
pub mod parser;
pub mod router;

pub use bundle::{Bundle, CommandProvider, CommandRegistry};
pub use definitions::{print_usage, Command, CommandHelp, ExitCode, INTERRUPTED_EXIT};
pub use handlers::{builtin_bundle, CommandContext};
pub use parser::{parse_command_line, CommandLineParser, ParseOutcome, SimpleParser};
pub use router::{find_command, resolve, CommandInput, ResolvedBinding};

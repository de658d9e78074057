//! CLI subcommand implementations.

pub mod cat;
pub mod check;
pub mod commit;
pub mod edit;
pub mod summary;
pub mod util;

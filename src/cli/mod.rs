pub(crate) mod args;
pub(crate) mod commands;

pub(crate) use args::{Cli, validate_address, validate_stylesheet};
pub(crate) use commands::{Mode, detect_mode};

//! Stored performance analysis sessions
//!
//! The on-disk data model: session identifiers, the system topology
//! description and the colour cache of each session.

pub(crate) mod colours;
pub(crate) mod identifier;
pub(crate) mod session;
pub(crate) mod system;

pub(crate) use identifier::Identifier;
pub(crate) use session::{SessionResults, scan_sessions};

//! Collaborators the HTTP layer delegates to.

pub mod releases;
pub mod templates;

//! Creator gate for writer commands.
//!
//! Readers never need a session. A site with no password configured is
//! open to anyone who can run the binary against it.

use crate::error::{MuseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorSession {
    authenticated: bool,
}

impl CreatorSession {
    pub fn authenticate(provided: Option<&str>, expected: Option<&str>) -> Self {
        let authenticated = match expected {
            None => true,
            Some(expected) => provided == Some(expected),
        };
        if !authenticated {
            tracing::debug!("creator password rejected");
        }
        CreatorSession { authenticated }
    }

    pub fn is_creator(&self) -> bool {
        self.authenticated
    }

    pub fn require_creator(&self) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(MuseError::NotAuthenticated)
        }
    }
}

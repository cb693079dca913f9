//! Driving port for reading the menu.

use async_trait::async_trait;

use crate::domain::{Error, MenuItem};

/// Domain use-case port for menu reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuQuery: Send + Sync {
    /// Items that can currently be ordered, by category then name.
    async fn list_menu(&self) -> Result<Vec<MenuItem>, Error>;
}

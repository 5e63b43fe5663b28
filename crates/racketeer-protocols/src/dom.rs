//! DOM probe trait: the page-facing half of the bust scanner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// A candidate clickable element as reported by the probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Position in document order within the probe's last query.
    pub index: usize,
    /// Visible text content.
    pub text: String,
    /// Class list.
    #[serde(default)]
    pub classes: Vec<String>,
}

impl ElementInfo {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            classes: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Trimmed, lower-cased text used for lexicon matching.
    pub fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// Query and act on the live document.
///
/// The core treats the probe as one pure query plus one side-effecting
/// command; everything else about the page is out of reach.
#[async_trait]
pub trait DomProbe: Send + Sync {
    /// All clickable candidates, in document order.
    async fn clickable_elements(&self) -> Result<Vec<ElementInfo>, ProbeError>;

    /// Dispatch a click on an element returned by the latest query.
    async fn click(&self, element: &ElementInfo) -> Result<(), ProbeError>;

    /// Undo any page-side state the probe installed.
    async fn release(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}

//! Knowledge-base training entry.

use serde::{Deserialize, Serialize};

/// Question/answer pair sent to the FAQ training endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

//! Simple query rewriters.

use async_trait::async_trait;

use ragrank_core::{QueryRewriter, Result};

/// Uses the latest user query as the search query.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRewriter;

#[async_trait]
impl QueryRewriter for PassthroughRewriter {
    async fn rewrite(&self, _history: &[String], latest: &str) -> Result<String> {
        Ok(latest.to_string())
    }
}

/// Always answers with the same text, whatever the conversation.
#[derive(Debug, Clone)]
pub struct FixedRewriter {
    output: String,
}

impl FixedRewriter {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

#[async_trait]
impl QueryRewriter for FixedRewriter {
    async fn rewrite(&self, _history: &[String], _latest: &str) -> Result<String> {
        Ok(self.output.clone())
    }
}

//! Session attached to a single page.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use super::client::Transport;
use super::error::CdpError;

/// A session attached to one page target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Send a CDP command to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .send(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_runtime(&self) -> Result<(), CdpError> {
        self.call("Runtime.enable", None).await?;
        debug!("Enabled Runtime domain for session {}", self.session_id);
        Ok(())
    }

    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;
        evaluation_value(result)
    }
}

/// Pull the value out of a `Runtime.evaluate` result.
pub(crate) fn evaluation_value(mut result: Value) -> Result<Value, CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let text = exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error");
        return Err(CdpError::JavaScript(text.to_string()));
    }
    Ok(result["result"]["value"].take())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_value() {
        let result = json!({ "result": { "type": "number", "value": 3 } });
        assert_eq!(evaluation_value(result).unwrap(), json!(3));
    }

    #[test]
    fn test_undefined_result_is_null() {
        let result = json!({ "result": { "type": "undefined" } });
        assert!(evaluation_value(result).unwrap().is_null());
    }

    #[test]
    fn test_exception_prefers_description() {
        let result = json!({
            "result": { "type": "object" },
            "exceptionDetails": {
                "text": "Uncaught",
                "exception": { "description": "TypeError: x is undefined" }
            }
        });
        let err = evaluation_value(result).unwrap_err();
        assert_eq!(err.to_string(), "JavaScript error: TypeError: x is undefined");
    }
}

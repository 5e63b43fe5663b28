//! `DomProbe` over a live browser tab.
//!
//! Each query stores the matched nodes in a page-side array so a later click
//! can address them by index. [`DomProbe::release`] removes that array.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use racketeer_config::BrowserConfig;
use racketeer_protocols::{DomProbe, ElementInfo, ProbeError};

use crate::cdp::{CdpClient, CdpError, PageSession};

/// Page global holding the nodes of the latest query.
pub const REGISTRY_GLOBAL: &str = "__racketeerButtons";

pub struct CdpDomProbe {
    // Owns the socket the session talks over
    _client: CdpClient,
    session: PageSession,
    selector: String,
}

impl CdpDomProbe {
    /// Connect to the browser and attach to the game tab.
    pub async fn connect(config: &BrowserConfig, selector: &str) -> Result<Self, CdpError> {
        let client = CdpClient::connect(&config.endpoint).await?;
        let session = client.attach_matching(&config.page_url_contains).await?;
        info!(
            "Attached DOM probe to target {} (selector {:?})",
            session.target_id(),
            selector
        );
        Ok(Self {
            _client: client,
            session,
            selector: selector.to_string(),
        })
    }
}

#[async_trait]
impl DomProbe for CdpDomProbe {
    async fn clickable_elements(&self) -> Result<Vec<ElementInfo>, ProbeError> {
        let value = self.session.evaluate(&list_script(&self.selector)).await?;
        parse_elements(value)
    }

    async fn click(&self, element: &ElementInfo) -> Result<(), ProbeError> {
        let clicked = self.session.evaluate(&click_script(element.index)).await?;
        if clicked.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(ProbeError::ElementGone(element.index))
        }
    }

    async fn release(&self) -> Result<(), ProbeError> {
        self.session.evaluate(&release_script()).await?;
        debug!("Removed page registry {}", REGISTRY_GLOBAL);
        Ok(())
    }
}

pub(crate) fn list_script(selector: &str) -> String {
    // A JSON string literal is also a valid JS string literal
    let selector = Value::String(selector.to_string()).to_string();
    format!(
        r#"(() => {{
  const nodes = Array.from(document.querySelectorAll({selector}));
  window.{REGISTRY_GLOBAL} = nodes;
  return nodes.map((el, index) => ({{
    index,
    text: el.textContent || "",
    classes: Array.from(el.classList || []),
  }}));
}})()"#
    )
}

pub(crate) fn click_script(index: usize) -> String {
    format!(
        r#"(() => {{
  const el = (window.{REGISTRY_GLOBAL} || [])[{index}];
  if (!el || !el.isConnected) return false;
  el.click();
  return true;
}})()"#
    )
}

pub(crate) fn release_script() -> String {
    format!("delete window.{REGISTRY_GLOBAL}; true")
}

pub(crate) fn parse_elements(value: Value) -> Result<Vec<ElementInfo>, ProbeError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| ProbeError::Script(e.to_string()))
}

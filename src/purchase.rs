//! Purchase intent tracking
//!
//! Remembers the last chosen plan and payment receipt in a [`ClientStore`] and
//! builds the pre-filled contact link from them.

use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

use crate::storage::ClientStore;

pub const KEY_LAST_PLAN: &str = "lastPlan";
pub const KEY_LAST_RECEIPT: &str = "lastReceipt";
pub const KEY_RECEIPT_PROMPT_SHOWN: &str = "receiptPromptShown";

/// Query parameters that may carry a receipt, highest priority first.
pub const RECEIPT_PARAMS: [&str; 5] = ["receipt", "tx", "paymentId", "payment_id", "token"];

const DEFAULT_PLAN: &str = "Purchase";

/// Characters `encodeURIComponent` leaves alone: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub struct PurchaseTracker<S: ClientStore> {
    store: S,
    contact_base_url: String,
}

impl<S: ClientStore> PurchaseTracker<S> {
    pub fn new(store: S, contact_base_url: impl Into<String>) -> Self {
        Self {
            store,
            contact_base_url: contact_base_url.into(),
        }
    }

    pub fn plan(&self) -> Option<String> {
        self.known(KEY_LAST_PLAN)
    }

    pub fn receipt(&self) -> Option<String> {
        self.known(KEY_LAST_RECEIPT)
    }

    /// Remember the chosen plan. A blank name is stored as "Purchase".
    pub fn select_plan(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        let plan = if name.is_empty() { DEFAULT_PLAN } else { name };
        tracing::info!(plan, "plan selected");
        self.store.set(KEY_LAST_PLAN, plan)
    }

    /// Pick up a receipt passed back on the landing URL.
    pub fn init(&mut self, url: &str) -> Result<Option<String>> {
        let receipt = receipt_from_url(url);
        if let Some(receipt) = &receipt {
            self.store.set(KEY_LAST_RECEIPT, receipt)?;
        }
        Ok(receipt)
    }

    /// Store a manually entered receipt. Blank input is ignored.
    pub fn save_receipt(&mut self, text: &str) -> Result<bool> {
        let receipt = text.trim();
        if receipt.is_empty() {
            return Ok(false);
        }
        self.store.set(KEY_LAST_RECEIPT, receipt)?;
        Ok(true)
    }

    pub fn contact_link(&self) -> Result<String> {
        contact_link(
            &self.contact_base_url,
            self.plan().as_deref(),
            self.receipt().as_deref(),
        )
    }

    /// True exactly once: when a plan is known, no receipt is, and the
    /// prompt has never been shown.
    pub fn take_receipt_prompt(&mut self) -> Result<bool> {
        let due = self.plan().is_some()
            && self.receipt().is_none()
            && self.store.get(KEY_RECEIPT_PROMPT_SHOWN).is_none();
        if due {
            self.store.set(KEY_RECEIPT_PROMPT_SHOWN, "1")?;
        }
        Ok(due)
    }

    fn known(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|value| !value.is_empty())
    }
}

/// First non-empty receipt parameter of `url`. Unparseable URLs carry none.
pub fn receipt_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    RECEIPT_PARAMS.iter().find_map(|param| {
        parsed
            .query_pairs()
            .find(|(key, value)| key == param && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })
}

pub fn contact_message(plan: Option<&str>, receipt: Option<&str>) -> String {
    let mut parts = Vec::new();
    if let Some(plan) = plan.filter(|p| !p.is_empty()) {
        parts.push(format!("Plan: {plan}"));
    }
    if let Some(receipt) = receipt.filter(|r| !r.is_empty()) {
        parts.push(format!("Receipt: {receipt}"));
    }

    let info = if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(" | "))
    };
    format!("Hi Barry, I am interested in Steam Unlock Onennabe{info}.")
}

/// `{base}?text={message}` with the message percent-encoded as a URI
/// component, so a space is `%20` and never `+`.
pub fn contact_link(base: &str, plan: Option<&str>, receipt: Option<&str>) -> Result<String> {
    let mut url =
        Url::parse(base).with_context(|| format!("Invalid contact base URL: {base}"))?;
    url.set_query(None);
    url.set_fragment(None);
    let message = contact_message(plan, receipt);
    Ok(format!(
        "{url}?text={}",
        utf8_percent_encode(&message, URI_COMPONENT)
    ))
}

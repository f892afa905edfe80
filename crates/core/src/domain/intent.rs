use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Slot name to current value. Unset slots are `None` and serialize as `null`.
pub type Slots = BTreeMap<String, Option<String>>;

/// Opaque per-conversation state owned by the platform.
pub type SessionAttributes = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvocationPhase {
    #[serde(alias = "DialogCodeHook")]
    Collecting,
    #[serde(alias = "FulfillmentCodeHook")]
    Fulfilling,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub invocation_phase: InvocationPhase,
    pub intent_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slots: Slots,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_attributes: SessionAttributes,
}

impl IntentRequest {
    pub fn new(invocation_phase: InvocationPhase, intent_name: impl Into<String>) -> Self {
        Self {
            invocation_phase,
            intent_name: intent_name.into(),
            slots: Slots::new(),
            session_attributes: SessionAttributes::new(),
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), Some(value.into()));
        self
    }

    pub fn with_session_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.session_attributes.insert(key.into(), value.into());
        self
    }

    /// Present, non-empty value of `name`.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        slot_value(&self.slots, name)
    }
}

/// Empty strings count as unset, matching how the platform reports an unfilled slot.
pub fn slot_value<'a>(slots: &'a Slots, name: &str) -> Option<&'a str> {
    slots.get(name).and_then(Option::as_deref).filter(|value| !value.is_empty())
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// One event of a block's ordered event log. Attribute order is the order the
/// emitting module wrote them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbciEvent {
    pub event_type: String,
    pub attributes: Vec<EventAttribute>,
}

impl AbciEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        self.attributes.push(EventAttribute {
            key: key.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
        });
        self
    }

    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&[u8]> {
        self.attributes
            .iter()
            .find(|attribute| attribute.key == key.as_bytes())
            .map(|attribute| attribute.value.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup_returns_first() {
        let event = AbciEvent::new("message")
            .with_attribute("module", "staking")
            .with_attribute("sender", "a")
            .with_attribute("sender", "b");
        assert_eq!(event.attribute("sender"), Some(&b"a"[..]));
        assert_eq!(event.attribute("missing"), None);
    }
}

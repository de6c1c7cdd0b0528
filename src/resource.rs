//! Polled Resources
//!
//! Each gossiper collection the client mirrors is described by a type
//! implementing [`Resource`]: where it lives, how its response body is
//! shaped, and how one entry is presented in a view.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::render::{ViewNode, ViewOptions};

/// Identifies a polled collection in logs and renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Peers,
    RoutablePeers,
    Messages,
    SearchMatches,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Peers => "peers",
            ResourceKind::RoutablePeers => "routable",
            ResourceKind::Messages => "messages",
            ResourceKind::SearchMatches => "matches",
        }
    }

    /// Section title used by renderers
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Peers => "Peers",
            ResourceKind::RoutablePeers => "Routable peers",
            ResourceKind::Messages => "Messages",
            ResourceKind::SearchMatches => "Search matches",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-side collection fetched in full on every poll
pub trait Resource: Send + Sync + 'static {
    /// One entry of the collection
    type Item: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// JSON body returned by `GET <PATH>`
    type Body: DeserializeOwned + Send + 'static;

    const KIND: ResourceKind;

    /// Endpoint path relative to the gossiper base URL
    const PATH: &'static str;

    /// Unwrap the response envelope, preserving server order
    fn items(body: Self::Body) -> Vec<Self::Item>;

    /// Present one entry
    fn node(item: &Self::Item, options: &ViewOptions) -> ViewNode;
}

#[derive(Debug, Deserialize)]
pub struct NodesBody {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesBody {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<MessageEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MatchesBody {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub matches: Vec<String>,
}

// Go encodes a nil slice as `null`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A rumor as reported by the gossiper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "Origin")]
    pub origin: String,
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Text")]
    pub text: String,
}

/// Entry of the `message` collection.
///
/// `Rumor` is the canonical shape. Older gossipers answer with bare
/// strings; those decode as `Legacy` and are shown verbatim. Anything
/// else is kept as `Other` so one odd record cannot hide the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageEntry {
    Rumor(Message),
    Legacy(String),
    Other(serde_json::Value),
}

/// Known peer addresses (`GET node`)
pub struct Peers;

/// Destinations present in the routing table (`GET routing`)
pub struct RoutablePeers;

/// Chat messages (`GET message`)
pub struct Messages;

/// File names matched by the last searches (`GET search`)
pub struct SearchMatches;

impl Resource for Peers {
    type Item = String;
    type Body = NodesBody;
    const KIND: ResourceKind = ResourceKind::Peers;
    const PATH: &'static str = "node";

    fn items(body: NodesBody) -> Vec<String> {
        body.nodes
    }

    fn node(item: &String, _options: &ViewOptions) -> ViewNode {
        ViewNode::Line(item.clone())
    }
}

impl Resource for RoutablePeers {
    type Item = String;
    type Body = NodesBody;
    const KIND: ResourceKind = ResourceKind::RoutablePeers;
    const PATH: &'static str = "routing";

    fn items(body: NodesBody) -> Vec<String> {
        body.nodes
    }

    fn node(item: &String, _options: &ViewOptions) -> ViewNode {
        ViewNode::Option {
            value: item.clone(),
            text: item.clone(),
        }
    }
}

impl Resource for Messages {
    type Item = MessageEntry;
    type Body = MessagesBody;
    const KIND: ResourceKind = ResourceKind::Messages;
    const PATH: &'static str = "message";

    fn items(body: MessagesBody) -> Vec<MessageEntry> {
        body.messages
    }

    fn node(item: &MessageEntry, _options: &ViewOptions) -> ViewNode {
        match item {
            MessageEntry::Rumor(m) => {
                ViewNode::Line(format!("Origin: {} ID: {} Text: {}", m.origin, m.id, m.text))
            }
            MessageEntry::Legacy(text) => ViewNode::Line(text.clone()),
            MessageEntry::Other(value) => ViewNode::Line(value.to_string()),
        }
    }
}

impl Resource for SearchMatches {
    type Item = String;
    type Body = MatchesBody;
    const KIND: ResourceKind = ResourceKind::SearchMatches;
    const PATH: &'static str = "search";

    fn items(body: MatchesBody) -> Vec<String> {
        body.matches
    }

    fn node(item: &String, options: &ViewOptions) -> ViewNode {
        let name = options.strip_search_prefix(item);
        ViewNode::Option {
            value: name.clone(),
            text: name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_records_decode() {
        let body: MessagesBody = serde_json::from_str(
            r#"{"messages": [{"Origin": "alice", "ID": 3, "Text": "hi"}]}"#,
        )
        .unwrap();
        let items = Messages::items(body);
        assert_eq!(
            items,
            vec![MessageEntry::Rumor(Message {
                origin: "alice".to_string(),
                id: 3,
                text: "hi".to_string(),
            })]
        );
    }

    #[test]
    fn test_legacy_message_strings_decode() {
        let body: MessagesBody = serde_json::from_str(r#"{"messages": ["hello"]}"#).unwrap();
        assert_eq!(
            Messages::items(body),
            vec![MessageEntry::Legacy("hello".to_string())]
        );
    }

    #[test]
    fn test_malformed_record_keeps_the_rest() {
        let body: MessagesBody = serde_json::from_str(
            r#"{"messages": [
                {"Origin": "a", "ID": 1, "Text": "x"},
                {"Origin": "b", "Text": "y"},
                {"Origin": "c", "ID": "two", "Text": "z"},
                "plain"
            ]}"#,
        )
        .unwrap();

        let options = ViewOptions::default();
        let lines: Vec<String> = Messages::items(body)
            .iter()
            .map(|entry| Messages::node(entry, &options).text().to_string())
            .collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Origin: a ID: 1 Text: x");
        let other: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(other, serde_json::json!({"Origin": "b", "Text": "y"}));
        let other: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();
        assert_eq!(other, serde_json::json!({"Origin": "c", "ID": "two", "Text": "z"}));
        assert_eq!(lines[3], "plain");
    }

    #[test]
    fn test_null_collection_is_empty() {
        let body: NodesBody = serde_json::from_str(r#"{"nodes": null}"#).unwrap();
        assert!(Peers::items(body).is_empty());

        let body: MatchesBody = serde_json::from_str(r#"{"matches": null}"#).unwrap();
        assert!(SearchMatches::items(body).is_empty());

        let body: NodesBody = serde_json::from_str("{}").unwrap();
        assert!(body.nodes.is_empty());
    }

    #[test]
    fn test_message_node_format() {
        let entry = MessageEntry::Rumor(Message {
            origin: "bob".to_string(),
            id: 1,
            text: "yo".to_string(),
        });
        assert_eq!(
            Messages::node(&entry, &ViewOptions::default()),
            ViewNode::Line("Origin: bob ID: 1 Text: yo".to_string())
        );
    }

    #[test]
    fn test_routable_entries_are_options() {
        let node = RoutablePeers::node(&"charlie".to_string(), &ViewOptions::default());
        assert_eq!(
            node,
            ViewNode::Option {
                value: "charlie".to_string(),
                text: "charlie".to_string(),
            }
        );
    }
}

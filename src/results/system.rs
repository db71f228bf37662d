//! System topology description
//!
//! Serde model of a session's `system/system.yml` and the JSON graph payload
//! the viewer sends to the browser.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};

/// Parsed `system/system.yml`: entities with their nodes, plus optional
/// directed edges between nodes.
#[derive(Debug, Deserialize)]
pub(crate) struct SystemDescription {
    pub(crate) entities: BTreeMap<String, Entity>,
    #[serde(default)]
    pub(crate) edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Entity {
    pub(crate) nodes: BTreeMap<String, NodeSettings>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeSettings {
    pub(crate) backend: BackendList,
}

/// `backend:` accepts a single module name or a list of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum BackendList {
    One(String),
    Many(Vec<String>),
}

impl BackendList {
    pub(crate) fn names(&self) -> &[String] {
        match self {
            BackendList::One(name) => std::slice::from_ref(name),
            BackendList::Many(names) => names,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct Edge {
    pub(crate) source: String,
    pub(crate) target: String,
}

/// Build the graph payload rendered by the browser.
///
/// `x`/`y` are fixed at 0; the layout runs client-side. The per-entity exit
/// code is attached to every node of the entity when known.
pub(crate) fn graph_payload(
    system: &SystemDescription,
    colours: &BTreeMap<String, String>,
    exit_codes: &HashMap<String, i32>,
) -> Value {
    let nodes: Vec<Value> = system
        .entities
        .iter()
        .flat_map(|(entity, spec)| {
            let colour = colours.get(entity).cloned().unwrap_or_default();
            spec.nodes.iter().map(move |(key, settings)| {
                json!({
                    "key": key,
                    "attributes": {
                        "x": 0,
                        "y": 0,
                        "label": key,
                        "size": 50,
                        "color": colour,
                        "entity": entity,
                        "backend": settings.backend.names(),
                        "exit_code": exit_codes.get(entity),
                    }
                })
            })
        })
        .collect();

    json!({
        "entities": colours,
        "system": {
            "options": {
                "allowSelfLoops": false,
                "multi": false,
                "type": "mixed"
            },
            "nodes": nodes,
            "edges": system.edges,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_YML: &str = r#"
entities:
  frontend:
    nodes:
      web1:
        backend: cpu_profile
  backend:
    nodes:
      db1:
        backend: [cpu_profile, roofline]
edges:
  - source: web1
    target: db1
"#;

    #[test]
    fn backend_accepts_string_or_list() {
        let system: SystemDescription = serde_yaml::from_str(SYSTEM_YML).unwrap();
        let web1 = &system.entities["frontend"].nodes["web1"];
        assert_eq!(web1.backend.names(), ["cpu_profile"]);
        let db1 = &system.entities["backend"].nodes["db1"];
        assert_eq!(db1.backend.names(), ["cpu_profile", "roofline"]);
    }

    #[test]
    fn missing_edges_default_to_empty() {
        let system: SystemDescription =
            serde_yaml::from_str("entities:\n  a:\n    nodes: {}\n").unwrap();
        assert!(system.edges.is_empty());
    }

    #[test]
    fn missing_entities_is_an_error() {
        assert!(serde_yaml::from_str::<SystemDescription>("edges: []\n").is_err());
    }

    #[test]
    fn payload_carries_colours_backends_and_edges() {
        let system: SystemDescription = serde_yaml::from_str(SYSTEM_YML).unwrap();
        let colours = BTreeMap::from([
            ("frontend".to_string(), "#646464".to_string()),
            ("backend".to_string(), "#b4b4b4".to_string()),
        ]);
        let exit_codes = HashMap::from([("backend".to_string(), 1)]);

        let payload = graph_payload(&system, &colours, &exit_codes);
        assert_eq!(payload["entities"]["frontend"], "#646464");
        assert_eq!(payload["system"]["options"]["allowSelfLoops"], false);
        assert_eq!(payload["system"]["options"]["type"], "mixed");

        let nodes = payload["system"]["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        // entities iterate in name order: "backend" before "frontend"
        assert_eq!(nodes[0]["key"], "db1");
        assert_eq!(nodes[0]["attributes"]["color"], "#b4b4b4");
        assert_eq!(nodes[0]["attributes"]["exit_code"], 1);
        assert_eq!(
            nodes[0]["attributes"]["backend"],
            json!(["cpu_profile", "roofline"])
        );
        assert_eq!(nodes[1]["key"], "web1");
        assert_eq!(nodes[1]["attributes"]["exit_code"], Value::Null);
        assert_eq!(nodes[1]["attributes"]["size"], 50);

        let edges = payload["system"]["edges"].as_array().unwrap();
        assert_eq!(edges[0]["source"], "web1");
        assert_eq!(edges[0]["target"], "db1");
    }
}

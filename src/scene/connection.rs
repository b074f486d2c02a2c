//! Connection records.

use tracing::debug;

use super::ObjectId;
use crate::format::Element;
use crate::util::{Error, Result};

/// Edge kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// `"OO"`: object to object.
    ObjectObject,
    /// `"OP"`: object to a named property of another object.
    ObjectProperty,
}

/// A declared edge; `from` is a child or dependent of `to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub from: ObjectId,
    pub to: ObjectId,
    pub kind: ConnectionKind,
    pub property: Option<String>,
}

/// Parse the `Connections` section. A missing section yields no edges.
pub fn parse_connections(root: &Element) -> Result<Vec<Connection>> {
    let Some(section) = root.child("Connections") else {
        debug!("no Connections section");
        return Ok(Vec::new());
    };

    let mut connections = Vec::with_capacity(section.children.len());
    for record in section.children_named("C") {
        let (Some(kind), Some(from), Some(to)) =
            (record.property(0), record.property(1), record.property(2))
        else {
            return Err(Error::InvalidConnection(format!(
                "expected at least 3 properties, found {}",
                record.properties.len()
            )));
        };
        if !kind.is_string() {
            return Err(Error::InvalidConnection("kind is not a string".into()));
        }

        let kind_str = kind.to_str();
        let (kind, property) = match kind_str.as_ref() {
            "OO" => (ConnectionKind::ObjectObject, None),
            "OP" => {
                let name = record
                    .property(3)
                    .ok_or_else(|| Error::InvalidConnection("OP record without property name".into()))?;
                (ConnectionKind::ObjectProperty, Some(name.to_str().into_owned()))
            }
            other => return Err(Error::UnsupportedConnection(other.to_string())),
        };

        connections.push(Connection { from: from.to_u64(), to: to.to_u64(), kind, property });
    }
    debug!(count = connections.len(), "parsed connections");
    Ok(connections)
}

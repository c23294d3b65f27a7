//! Static catalog of the simulated OPC UA address space.
//!
//! Six nodes, fixed at build time: the standard Root and Objects folders,
//! one PLC object and three of its variables. Only Temperature and
//! Vibration are bound to live telemetry; Pressure is browsable but never
//! sampled.

use opcsim_core::SensorId;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// A node in the simulated address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    Root,
    Objects,
    Plc,
    Temperature,
    Pressure,
    Vibration,
}

impl NodeId {
    /// Every node, in browse order.
    pub const ALL: [NodeId; 6] = [
        NodeId::Root,
        NodeId::Objects,
        NodeId::Plc,
        NodeId::Temperature,
        NodeId::Pressure,
        NodeId::Vibration,
    ];
}

// ---------------------------------------------------------------------------
// NodeAttributes
// ---------------------------------------------------------------------------

/// OPC UA attribute set shown when a node is inspected.
#[derive(Debug, Clone, Copy)]
pub struct NodeAttributes {
    pub node_id: &'static str,
    pub namespace: &'static str,
    pub identifier_type: &'static str,
    pub browse_name: &'static str,
    pub node_class: &'static str,
    pub data_type: Option<&'static str>,
    pub access_level: &'static str,
    pub user_access_level: &'static str,
    pub description: Option<&'static str>,
}

impl NodeAttributes {
    /// Fully qualified identifier, e.g. `ns=1;s=Temp`.
    pub fn qualified_id(&self) -> String {
        format!("ns={};{}", self.namespace, self.node_id)
    }
}

/// Attribute set for one node.
pub fn node_attributes(node: NodeId) -> NodeAttributes {
    let base = NodeAttributes {
        node_id: "",
        namespace: "1",
        identifier_type: "String",
        browse_name: "",
        node_class: "Object",
        data_type: None,
        access_level: "CurrentRead",
        user_access_level: "CurrentRead",
        description: None,
    };

    match node {
        NodeId::Root => NodeAttributes {
            node_id: "i=84",
            identifier_type: "Numeric",
            browse_name: "Root",
            ..base
        },
        NodeId::Objects => NodeAttributes {
            node_id: "i=85",
            identifier_type: "Numeric",
            browse_name: "Objects",
            ..base
        },
        NodeId::Plc => NodeAttributes {
            node_id: "s=S7_1500",
            browse_name: "Siemens_S7_1500",
            description: Some("Main plant PLC"),
            ..base
        },
        NodeId::Temperature => NodeAttributes {
            node_id: "s=Temp",
            browse_name: "Temperature",
            node_class: "Variable",
            data_type: Some("Double"),
            access_level: "CurrentReadWrite",
            ..base
        },
        NodeId::Pressure => NodeAttributes {
            node_id: "s=Pres",
            browse_name: "Pressure",
            node_class: "Variable",
            data_type: Some("Float"),
            ..base
        },
        NodeId::Vibration => NodeAttributes {
            node_id: "s=Vib",
            browse_name: "Vibration_RMS",
            node_class: "Variable",
            data_type: Some("Double"),
            ..base
        },
    }
}

/// Live sensor backing a variable node, if any.
pub fn sensor_binding(node: NodeId) -> Option<SensorId> {
    match node {
        NodeId::Temperature => Some(SensorId::Temperature),
        NodeId::Vibration => Some(SensorId::VibrationRms),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

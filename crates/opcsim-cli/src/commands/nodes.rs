//! `opcsim nodes` — print the simulated address space as a table.

use crate::address_space::{self, NodeId};

pub fn run() {
    println!(
        "Simulated OPC UA address space ({} nodes)",
        NodeId::ALL.len()
    );
    println!();
    println!(
        "{:<12}  {:<16}  {:<9}  {:<8}  {}",
        "NodeId", "BrowseName", "NodeClass", "DataType", "Description"
    );

    for node in NodeId::ALL {
        let attrs = address_space::node_attributes(node);
        println!(
            "{:<12}  {:<16}  {:<9}  {:<8}  {}",
            attrs.qualified_id(),
            attrs.browse_name,
            attrs.node_class,
            attrs.data_type.unwrap_or("-"),
            attrs.description.unwrap_or("-"),
        );
    }
}

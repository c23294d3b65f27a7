//! Static identity of the simulated server pair.

use crate::state::ServerRole;

/// Display-only metadata describing the simulated OPC UA server.
///
/// Nothing in the engine consults these values; they exist so adapters can
/// render a believable connection panel.
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    pub application_name: &'static str,
    pub security_policy: &'static str,
    pub message_security_mode: &'static str,
    pub primary_endpoint: &'static str,
    pub secondary_endpoint: &'static str,
}

impl ServerIdentity {
    /// Endpoint URL owned by the given server.
    pub fn endpoint(&self, role: ServerRole) -> &'static str {
        match role {
            ServerRole::Primary => self.primary_endpoint,
            ServerRole::Secondary => self.secondary_endpoint,
        }
    }
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            application_name: "S7-1500 Plant Gateway",
            security_policy: "Basic256Sha256",
            message_security_mode: "SignAndEncrypt",
            primary_endpoint: "opc.tcp://localhost:4840",
            secondary_endpoint: "opc.tcp://localhost:4841",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_differ_per_role() {
        let identity = ServerIdentity::default();
        assert_ne!(
            identity.endpoint(ServerRole::Primary),
            identity.endpoint(ServerRole::Secondary)
        );
    }

    #[test]
    fn test_default_identity() {
        let identity = ServerIdentity::default();
        assert_eq!(identity.security_policy, "Basic256Sha256");
        assert_eq!(identity.message_security_mode, "SignAndEncrypt");
        assert!(identity.primary_endpoint.starts_with("opc.tcp://"));
        assert!(identity.secondary_endpoint.starts_with("opc.tcp://"));
    }
}

//! Route catalog and the static tab lists built on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::permission::Permission;

/// A navigable view of the console.
///
/// Route names are used only for navigation targeting; they carry no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteName {
    #[serde(rename = "keys")]
    Keys,
    #[serde(rename = "diagnostics")]
    Diagnostics,
    #[serde(rename = "add-subsystem")]
    AddSubsystem,
    #[serde(rename = "add-client")]
    AddClient,
    #[serde(rename = "clients")]
    Clients,
    #[serde(rename = "subsystem")]
    Subsystem,
    #[serde(rename = "client")]
    Client,
    /// The login form; reachable without a session.
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "certificate")]
    Certificate,
    #[serde(rename = "client-tls-certificate")]
    ClientTlsCertificate,
    #[serde(rename = "member-details")]
    MemberDetails,
    #[serde(rename = "member-servers")]
    MemberServers,
    #[serde(rename = "subs-details")]
    SubsystemDetails,
    #[serde(rename = "subs-servers")]
    SubsystemServers,
    #[serde(rename = "subs-local-groups")]
    SubsystemLocalGroups,
    #[serde(rename = "local-group")]
    LocalGroup,
    #[serde(rename = "subs-clients")]
    SubsystemServiceClients,
    #[serde(rename = "subs-services")]
    SubsystemServices,
    #[serde(rename = "service-description-details")]
    ServiceDescriptionDetails,
    #[serde(rename = "service")]
    Service,
    #[serde(rename = "service-parameters")]
    ServiceParameters,
    #[serde(rename = "service-endpoints")]
    Endpoints,
    /// Landing view of the keys tab.
    #[serde(rename = "sign-and-auth-keys")]
    SignAndAuthKeys,
    #[serde(rename = "api-key")]
    ApiKey,
    #[serde(rename = "create-api-key")]
    CreateApiKey,
    #[serde(rename = "ss-tls-certificate")]
    SsTlsCertificate,
    #[serde(rename = "token")]
    Token,
    #[serde(rename = "key")]
    Key,
    /// Landing view of the settings tab.
    #[serde(rename = "system-parameters")]
    SystemParameters,
    #[serde(rename = "backup-and-restore")]
    BackupAndRestore,
    #[serde(rename = "add-key")]
    AddKey,
    #[serde(rename = "generate-csr")]
    GenerateCertificateSignRequest,
    #[serde(rename = "internal-tls-certificate")]
    InternalTlsCertificate,
    #[serde(rename = "generate-internal-csr")]
    GenerateInternalCsr,
    #[serde(rename = "endpoint-details")]
    EndpointDetails,
    #[serde(rename = "endpoint-access-rights")]
    EndpointAccessRights,
    #[serde(rename = "service-client-access-rights")]
    ServiceClientAccessRights,
    #[serde(rename = "add-service-client-access-right")]
    AddServiceClientAccessRight,
}

impl RouteName {
    /// Every route, in catalog order.
    pub const ALL: [Self; 38] = [
        Self::Keys,
        Self::Diagnostics,
        Self::AddSubsystem,
        Self::AddClient,
        Self::Clients,
        Self::Subsystem,
        Self::Client,
        Self::Login,
        Self::Certificate,
        Self::ClientTlsCertificate,
        Self::MemberDetails,
        Self::MemberServers,
        Self::SubsystemDetails,
        Self::SubsystemServers,
        Self::SubsystemLocalGroups,
        Self::LocalGroup,
        Self::SubsystemServiceClients,
        Self::SubsystemServices,
        Self::ServiceDescriptionDetails,
        Self::Service,
        Self::ServiceParameters,
        Self::Endpoints,
        Self::SignAndAuthKeys,
        Self::ApiKey,
        Self::CreateApiKey,
        Self::SsTlsCertificate,
        Self::Token,
        Self::Key,
        Self::SystemParameters,
        Self::BackupAndRestore,
        Self::AddKey,
        Self::GenerateCertificateSignRequest,
        Self::InternalTlsCertificate,
        Self::GenerateInternalCsr,
        Self::EndpointDetails,
        Self::EndpointAccessRights,
        Self::ServiceClientAccessRights,
        Self::AddServiceClientAccessRight,
    ];

    /// The wire name of this route.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keys => "keys",
            Self::Diagnostics => "diagnostics",
            Self::AddSubsystem => "add-subsystem",
            Self::AddClient => "add-client",
            Self::Clients => "clients",
            Self::Subsystem => "subsystem",
            Self::Client => "client",
            Self::Login => "login",
            Self::Certificate => "certificate",
            Self::ClientTlsCertificate => "client-tls-certificate",
            Self::MemberDetails => "member-details",
            Self::MemberServers => "member-servers",
            Self::SubsystemDetails => "subs-details",
            Self::SubsystemServers => "subs-servers",
            Self::SubsystemLocalGroups => "subs-local-groups",
            Self::LocalGroup => "local-group",
            Self::SubsystemServiceClients => "subs-clients",
            Self::SubsystemServices => "subs-services",
            Self::ServiceDescriptionDetails => "service-description-details",
            Self::Service => "service",
            Self::ServiceParameters => "service-parameters",
            Self::Endpoints => "service-endpoints",
            Self::SignAndAuthKeys => "sign-and-auth-keys",
            Self::ApiKey => "api-key",
            Self::CreateApiKey => "create-api-key",
            Self::SsTlsCertificate => "ss-tls-certificate",
            Self::Token => "token",
            Self::Key => "key",
            Self::SystemParameters => "system-parameters",
            Self::BackupAndRestore => "backup-and-restore",
            Self::AddKey => "add-key",
            Self::GenerateCertificateSignRequest => "generate-csr",
            Self::InternalTlsCertificate => "internal-tls-certificate",
            Self::GenerateInternalCsr => "generate-internal-csr",
            Self::EndpointDetails => "endpoint-details",
            Self::EndpointAccessRights => "endpoint-access-rights",
            Self::ServiceClientAccessRights => "service-client-access-rights",
            Self::AddServiceClientAccessRight => "add-service-client-access-right",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownRoute { name: s.to_owned() })
    }
}

/// A static tab descriptor: a route plus the permission needed to see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tab {
    /// Route the tab navigates to.
    pub to: RouteName,
    /// Stable key used to identify the tab in the UI.
    pub key: &'static str,
    /// Translation key for the tab label.
    pub name: &'static str,
    /// Permission required to show the tab. `None` means always visible.
    pub permission: Option<Permission>,
}

/// Top-level navigation tabs, in display order.
pub const MAIN_TABS: [Tab; 4] = [
    Tab {
        to: RouteName::Clients,
        key: "clients",
        name: "tab.main.clients",
        permission: Some(Permission::ViewClients),
    },
    Tab {
        to: RouteName::SignAndAuthKeys,
        key: "keys",
        name: "tab.main.keys",
        permission: Some(Permission::ViewKeys),
    },
    Tab {
        to: RouteName::Diagnostics,
        key: "diagnostics",
        name: "tab.main.diagnostics",
        permission: Some(Permission::Diagnostics),
    },
    Tab {
        to: RouteName::SystemParameters,
        key: "settings",
        name: "tab.main.settings",
        permission: None,
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn route_names_are_unique() {
        let names: HashSet<&str> = RouteName::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names.len(), RouteName::ALL.len());
    }

    #[test]
    fn serde_name_matches_as_str() {
        for route in RouteName::ALL {
            let json = serde_json::to_string(&route).unwrap();
            assert_eq!(json, format!("\"{}\"", route.as_str()));
        }
    }

    #[test]
    fn irregular_route_names_parse() {
        assert_eq!("subs-details".parse::<RouteName>().unwrap(), RouteName::SubsystemDetails);
        assert_eq!("generate-csr".parse::<RouteName>().unwrap(), RouteName::GenerateCertificateSignRequest);
        assert_eq!("service-endpoints".parse::<RouteName>().unwrap(), RouteName::Endpoints);
        assert_eq!("ss-tls-certificate".parse::<RouteName>().unwrap(), RouteName::SsTlsCertificate);
        assert_eq!("generate-internal-csr".parse::<RouteName>().unwrap(), RouteName::GenerateInternalCsr);
        assert!(matches!(
            "nowhere".parse::<RouteName>(),
            Err(CatalogError::UnknownRoute { .. })
        ));
    }

    #[test]
    fn main_tabs_have_unique_keys_and_settings_is_ungated() {
        let keys: HashSet<&str> = MAIN_TABS.iter().map(|t| t.key).collect();
        assert_eq!(keys.len(), MAIN_TABS.len());

        let settings = MAIN_TABS.iter().find(|t| t.key == "settings").unwrap();
        assert_eq!(settings.to, RouteName::SystemParameters);
        assert!(settings.permission.is_none());
    }
}

//! Permission and role catalogs.
//!
//! Both sets are closed and fixed at build time. The backend resolves roles
//! into permissions; the console only ever receives the resolved permission
//! strings for the current session and never maps a [`Role`] to anything.
//! Adding a permission means adding a variant here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A grantable capability that gates a view, tab, or control.
///
/// The wire form is the `SCREAMING_SNAKE_CASE` name the backend sends in the
/// `/user` payload (e.g. `VIEW_CLIENTS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ActivateDisableAuthCert,
    ActivateDisableSignCert,
    ActivateDeactivateToken,
    AddClient,
    AddClientInternalCert,
    AddLocalGroup,
    AddTsp,
    AddWsdl,
    /// Backup half of the backup and restore view.
    BackupConfiguration,
    DeleteAuthCert,
    DeleteAuthKey,
    DeleteClient,
    DeleteClientInternalCert,
    DeleteKey,
    DeleteLocalGroup,
    DeleteSignCert,
    DeleteSignKey,
    DeleteTsp,
    DeleteWsdl,
    DeleteEndpoint,
    /// Gates the diagnostics tab.
    Diagnostics,
    DownloadAnchor,
    EditAclSubjectOpenServices,
    EditClientInternalConnectionType,
    EditKeyFriendlyName,
    EditLocalGroupDesc,
    EditLocalGroupMembers,
    EditServiceAcl,
    EditServiceParams,
    EditTokenFriendlyName,
    EditWsdl,
    /// Toggle a service description on or off.
    EnableDisableWsdl,
    /// Export the internal TLS certificate.
    ExportInternalSslCert,
    GenerateAuthCertReq,
    GenerateInternalCertReq,
    GenerateInternalSsl,
    GenerateInternalSslCsr,
    GenerateKey,
    GenerateSignCertReq,
    ImportAuthCert,
    ImportInternalSslCert,
    ImportSignCert,
    InitConfig,
    RefreshWsdl,
    RefreshRest,
    /// Refresh an OpenAPI 3 service description.
    RefreshOpenapi3,
    RestoreConfiguration,
    SendAuthCertDelReq,
    SendAuthCertRegReq,
    SendClientDelReq,
    SendClientRegReq,
    UploadAnchor,
    ViewAclSubjectOpenServices,
    ViewAnchor,
    /// Gates the clients tab.
    ViewClients,
    ViewClientAclSubjects,
    ViewClientDetails,
    ViewClientInternalCerts,
    ViewClientInternalCertDetails,
    ViewClientInternalConnectionType,
    ViewClientLocalGroups,
    ViewClientServices,
    ViewInternalSslCert,
    /// Gates the keys and certificates tab.
    ViewKeys,
    ViewServiceAcl,
    /// System parameters view inside settings.
    ViewSysParams,
    ViewTsps,
}

impl Permission {
    /// Every permission, in catalog order.
    pub const ALL: [Self; 67] = [
        Self::ActivateDisableAuthCert,
        Self::ActivateDisableSignCert,
        Self::ActivateDeactivateToken,
        Self::AddClient,
        Self::AddClientInternalCert,
        Self::AddLocalGroup,
        Self::AddTsp,
        Self::AddWsdl,
        Self::BackupConfiguration,
        Self::DeleteAuthCert,
        Self::DeleteAuthKey,
        Self::DeleteClient,
        Self::DeleteClientInternalCert,
        Self::DeleteKey,
        Self::DeleteLocalGroup,
        Self::DeleteSignCert,
        Self::DeleteSignKey,
        Self::DeleteTsp,
        Self::DeleteWsdl,
        Self::DeleteEndpoint,
        Self::Diagnostics,
        Self::DownloadAnchor,
        Self::EditAclSubjectOpenServices,
        Self::EditClientInternalConnectionType,
        Self::EditKeyFriendlyName,
        Self::EditLocalGroupDesc,
        Self::EditLocalGroupMembers,
        Self::EditServiceAcl,
        Self::EditServiceParams,
        Self::EditTokenFriendlyName,
        Self::EditWsdl,
        Self::EnableDisableWsdl,
        Self::ExportInternalSslCert,
        Self::GenerateAuthCertReq,
        Self::GenerateInternalCertReq,
        Self::GenerateInternalSsl,
        Self::GenerateInternalSslCsr,
        Self::GenerateKey,
        Self::GenerateSignCertReq,
        Self::ImportAuthCert,
        Self::ImportInternalSslCert,
        Self::ImportSignCert,
        Self::InitConfig,
        Self::RefreshWsdl,
        Self::RefreshRest,
        Self::RefreshOpenapi3,
        Self::RestoreConfiguration,
        Self::SendAuthCertDelReq,
        Self::SendAuthCertRegReq,
        Self::SendClientDelReq,
        Self::SendClientRegReq,
        Self::UploadAnchor,
        Self::ViewAclSubjectOpenServices,
        Self::ViewAnchor,
        Self::ViewClients,
        Self::ViewClientAclSubjects,
        Self::ViewClientDetails,
        Self::ViewClientInternalCerts,
        Self::ViewClientInternalCertDetails,
        Self::ViewClientInternalConnectionType,
        Self::ViewClientLocalGroups,
        Self::ViewClientServices,
        Self::ViewInternalSslCert,
        Self::ViewKeys,
        Self::ViewServiceAcl,
        Self::ViewSysParams,
        Self::ViewTsps,
    ];

    /// The wire name of this permission.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActivateDisableAuthCert => "ACTIVATE_DISABLE_AUTH_CERT",
            Self::ActivateDisableSignCert => "ACTIVATE_DISABLE_SIGN_CERT",
            Self::ActivateDeactivateToken => "ACTIVATE_DEACTIVATE_TOKEN",
            Self::AddClient => "ADD_CLIENT",
            Self::AddClientInternalCert => "ADD_CLIENT_INTERNAL_CERT",
            Self::AddLocalGroup => "ADD_LOCAL_GROUP",
            Self::AddTsp => "ADD_TSP",
            Self::AddWsdl => "ADD_WSDL",
            Self::BackupConfiguration => "BACKUP_CONFIGURATION",
            Self::DeleteAuthCert => "DELETE_AUTH_CERT",
            Self::DeleteAuthKey => "DELETE_AUTH_KEY",
            Self::DeleteClient => "DELETE_CLIENT",
            Self::DeleteClientInternalCert => "DELETE_CLIENT_INTERNAL_CERT",
            Self::DeleteKey => "DELETE_KEY",
            Self::DeleteLocalGroup => "DELETE_LOCAL_GROUP",
            Self::DeleteSignCert => "DELETE_SIGN_CERT",
            Self::DeleteSignKey => "DELETE_SIGN_KEY",
            Self::DeleteTsp => "DELETE_TSP",
            Self::DeleteWsdl => "DELETE_WSDL",
            Self::DeleteEndpoint => "DELETE_ENDPOINT",
            Self::Diagnostics => "DIAGNOSTICS",
            Self::DownloadAnchor => "DOWNLOAD_ANCHOR",
            Self::EditAclSubjectOpenServices => "EDIT_ACL_SUBJECT_OPEN_SERVICES",
            Self::EditClientInternalConnectionType => "EDIT_CLIENT_INTERNAL_CONNECTION_TYPE",
            Self::EditKeyFriendlyName => "EDIT_KEY_FRIENDLY_NAME",
            Self::EditLocalGroupDesc => "EDIT_LOCAL_GROUP_DESC",
            Self::EditLocalGroupMembers => "EDIT_LOCAL_GROUP_MEMBERS",
            Self::EditServiceAcl => "EDIT_SERVICE_ACL",
            Self::EditServiceParams => "EDIT_SERVICE_PARAMS",
            Self::EditTokenFriendlyName => "EDIT_TOKEN_FRIENDLY_NAME",
            Self::EditWsdl => "EDIT_WSDL",
            Self::EnableDisableWsdl => "ENABLE_DISABLE_WSDL",
            Self::ExportInternalSslCert => "EXPORT_INTERNAL_SSL_CERT",
            Self::GenerateAuthCertReq => "GENERATE_AUTH_CERT_REQ",
            Self::GenerateInternalCertReq => "GENERATE_INTERNAL_CERT_REQ",
            Self::GenerateInternalSsl => "GENERATE_INTERNAL_SSL",
            Self::GenerateInternalSslCsr => "GENERATE_INTERNAL_SSL_CSR",
            Self::GenerateKey => "GENERATE_KEY",
            Self::GenerateSignCertReq => "GENERATE_SIGN_CERT_REQ",
            Self::ImportAuthCert => "IMPORT_AUTH_CERT",
            Self::ImportInternalSslCert => "IMPORT_INTERNAL_SSL_CERT",
            Self::ImportSignCert => "IMPORT_SIGN_CERT",
            Self::InitConfig => "INIT_CONFIG",
            Self::RefreshWsdl => "REFRESH_WSDL",
            Self::RefreshRest => "REFRESH_REST",
            Self::RefreshOpenapi3 => "REFRESH_OPENAPI3",
            Self::RestoreConfiguration => "RESTORE_CONFIGURATION",
            Self::SendAuthCertDelReq => "SEND_AUTH_CERT_DEL_REQ",
            Self::SendAuthCertRegReq => "SEND_AUTH_CERT_REG_REQ",
            Self::SendClientDelReq => "SEND_CLIENT_DEL_REQ",
            Self::SendClientRegReq => "SEND_CLIENT_REG_REQ",
            Self::UploadAnchor => "UPLOAD_ANCHOR",
            Self::ViewAclSubjectOpenServices => "VIEW_ACL_SUBJECT_OPEN_SERVICES",
            Self::ViewAnchor => "VIEW_ANCHOR",
            Self::ViewClients => "VIEW_CLIENTS",
            Self::ViewClientAclSubjects => "VIEW_CLIENT_ACL_SUBJECTS",
            Self::ViewClientDetails => "VIEW_CLIENT_DETAILS",
            Self::ViewClientInternalCerts => "VIEW_CLIENT_INTERNAL_CERTS",
            Self::ViewClientInternalCertDetails => "VIEW_CLIENT_INTERNAL_CERT_DETAILS",
            Self::ViewClientInternalConnectionType => "VIEW_CLIENT_INTERNAL_CONNECTION_TYPE",
            Self::ViewClientLocalGroups => "VIEW_CLIENT_LOCAL_GROUPS",
            Self::ViewClientServices => "VIEW_CLIENT_SERVICES",
            Self::ViewInternalSslCert => "VIEW_INTERNAL_SSL_CERT",
            Self::ViewKeys => "VIEW_KEYS",
            Self::ViewServiceAcl => "VIEW_SERVICE_ACL",
            Self::ViewSysParams => "VIEW_SYS_PARAMS",
            Self::ViewTsps => "VIEW_TSPS",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownPermission {
                name: s.to_owned(),
            })
    }
}

/// A backend-assigned bundle of permissions.
///
/// Roles are listed for display and tooling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "XROAD_SECURITY_OFFICER")]
    SecurityOfficer,
    #[serde(rename = "XROAD_REGISTRATION_OFFICER")]
    RegistrationOfficer,
    #[serde(rename = "XROAD_SERVICE_ADMINISTRATOR")]
    ServiceAdministrator,
    #[serde(rename = "XROAD_SYSTEM_ADMINISTRATOR")]
    SystemAdministrator,
    #[serde(rename = "XROAD_SECURITYSERVER_OBSERVER")]
    SecurityServerObserver,
}

impl Role {
    /// Every role, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::SecurityOfficer,
        Self::RegistrationOfficer,
        Self::ServiceAdministrator,
        Self::SystemAdministrator,
        Self::SecurityServerObserver,
    ];

    /// The wire name of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SecurityOfficer => "XROAD_SECURITY_OFFICER",
            Self::RegistrationOfficer => "XROAD_REGISTRATION_OFFICER",
            Self::ServiceAdministrator => "XROAD_SERVICE_ADMINISTRATOR",
            Self::SystemAdministrator => "XROAD_SYSTEM_ADMINISTRATOR",
            Self::SecurityServerObserver => "XROAD_SECURITYSERVER_OBSERVER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownRole { name: s.to_owned() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn wire_names_are_unique() {
        let names: HashSet<&str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(names.len(), Permission::ALL.len());
    }

    #[test]
    fn serde_name_matches_as_str() {
        for perm in Permission::ALL {
            let json = serde_json::to_string(&perm).unwrap();
            assert_eq!(json, format!("\"{}\"", perm.as_str()), "mismatch for {perm:?}");
        }
    }

    #[test]
    fn parse_known_permission() {
        assert_eq!("VIEW_CLIENTS".parse::<Permission>().unwrap(), Permission::ViewClients);
        assert_eq!("DIAGNOSTICS".parse::<Permission>().unwrap(), Permission::Diagnostics);
        assert_eq!(
            "REFRESH_OPENAPI3".parse::<Permission>().unwrap(),
            Permission::RefreshOpenapi3
        );
    }

    #[test]
    fn parse_unknown_permission_fails() {
        let err = "view_clients".parse::<Permission>().unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPermission { ref name } if name == "view_clients"));
    }

    #[test]
    fn roles_round_trip_through_wire_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        assert!("ROLE_XROAD_SECURITY_OFFICER".parse::<Role>().is_err());
    }
}

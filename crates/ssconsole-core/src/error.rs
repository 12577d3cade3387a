//! Error types for `ssconsole-core`.
//!
//! Catalog errors only arise at the edges where free-form text is parsed into
//! a catalog value (CLI arguments, configuration). Inside the library the
//! enums make an unknown value unrepresentable.

/// A string did not name any entry of a closed catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Not a known permission.
    #[error("unknown permission: {name}")]
    UnknownPermission { name: String },

    /// Not a known role.
    #[error("unknown role: {name}")]
    UnknownRole { name: String },

    /// Not a known route.
    #[error("unknown route: {name}")]
    UnknownRoute { name: String },
}

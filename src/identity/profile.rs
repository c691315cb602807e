use serde::{Deserialize, Serialize};

/// The user profile as the backend serves it. Field names on the wire are
/// the backend's own (`PhanQuyen`, `QuyenXem`, ...); every field is
/// defaulted so a sparse or older server reply still decodes. Permission
/// flags are only ever changed through the employee-management API, never
/// computed locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    /// Coarse role tag: "Admin", "Editor", anything else is an ordinary user.
    #[serde(rename = "PhanQuyen", default)]
    pub role_tag: String,
    /// Per-action permission flags.
    #[serde(rename = "QuyenXem", default)]
    pub can_view: bool,
    #[serde(rename = "QuyenThem", default)]
    pub can_create: bool,
    #[serde(rename = "QuyenSua", default)]
    pub can_edit: bool,
    #[serde(rename = "QuyenXoa", default)]
    pub can_delete: bool,
    /// Avatar URL at the media host, when one has been uploaded.
    #[serde(rename = "Image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

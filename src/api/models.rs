//! Wire schemas for the backend's resources. Responses arrive with the
//! backend's PascalCase names, write bodies use its camelCase names; both
//! directions are explicit serde structs with per-field defaults so a
//! sparse reply decodes instead of failing. Nothing downstream reads loose
//! JSON.

use serde::{Deserialize, Serialize};

/// Publication states of a post.
pub mod post_status {
    pub const DRAFT: i64 = 0;
    pub const PUBLIC: i64 = 1;
    pub const HIDDEN: i64 = 2;
}

/// A post as the backend serves it (list, detail and slug lookups).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Post {
    #[serde(rename = "BaiVietID", default)]
    pub id: i64,
    #[serde(rename = "TieuDe", default)]
    pub title: String,
    #[serde(rename = "TieuDeKhongDau", default)]
    pub slug: String,
    #[serde(rename = "MoTaNgan", default)]
    pub summary: String,
    #[serde(rename = "NoiDung", default)]
    pub content: String,
    #[serde(rename = "Thumbnail", default)]
    pub thumbnail: String,
    #[serde(rename = "MetaTitle", default)]
    pub meta_title: String,
    #[serde(rename = "MetaKeywords", default)]
    pub meta_keywords: String,
    #[serde(rename = "DanhMucID", default)]
    pub category_id: Option<i64>,
    #[serde(rename = "TenDanhMuc", default)]
    pub category_name: String,
    #[serde(rename = "TenTacGia", default)]
    pub author_name: String,
    #[serde(rename = "NoIndex", default)]
    pub no_index: bool,
    #[serde(rename = "CanonicalURL", default)]
    pub canonical_url: String,
    #[serde(rename = "TrangThai", default)]
    pub status: i64,
    #[serde(rename = "LuotXem", default)]
    pub views: i64,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<String>,
}

/// Outgoing post body for create and update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PostDraft {
    #[serde(rename = "tieuDe")]
    pub title: String,
    #[serde(rename = "tieuDeKhongDau")]
    pub slug: String,
    #[serde(rename = "moTaNgan")]
    pub summary: String,
    #[serde(rename = "noiDung")]
    pub content: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail: String,
    #[serde(rename = "metaTitle")]
    pub meta_title: String,
    #[serde(rename = "metaKeywords")]
    pub meta_keywords: String,
    #[serde(rename = "danhMucID")]
    pub category_id: Option<i64>,
    #[serde(rename = "noIndex")]
    pub no_index: bool,
    #[serde(rename = "canonicalURL")]
    pub canonical_url: String,
    #[serde(rename = "trangThai")]
    pub status: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Category {
    #[serde(rename = "DanhMucID", default)]
    pub id: i64,
    #[serde(rename = "TenDanhMuc", default)]
    pub name: String,
    #[serde(rename = "MoTa", default)]
    pub description: String,
    #[serde(rename = "DanhMucChaID", default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "ThuTu", default)]
    pub order: i64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategoryDraft {
    #[serde(rename = "tenDanhMuc")]
    pub name: String,
    #[serde(rename = "moTa")]
    pub description: String,
    #[serde(rename = "danhMucChaID")]
    pub parent_id: Option<i64>,
    #[serde(rename = "thuTu")]
    pub order: i64,
}

/// An employee record as served by the backend.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Employee {
    #[serde(rename = "NhanVienID", default)]
    pub id: i64,
    #[serde(rename = "HoVaTen", default)]
    pub full_name: String,
    #[serde(rename = "Username", default)]
    pub username: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "ChucVu", default)]
    pub position: String,
    #[serde(rename = "Phong", default)]
    pub department: String,
    #[serde(rename = "PhanQuyen", default)]
    pub role_tag: String,
    #[serde(rename = "QuyenXem", default)]
    pub can_view: bool,
    #[serde(rename = "QuyenThem", default)]
    pub can_create: bool,
    #[serde(rename = "QuyenSua", default)]
    pub can_edit: bool,
    #[serde(rename = "QuyenXoa", default)]
    pub can_delete: bool,
    #[serde(rename = "TrangThai", default)]
    pub active: bool,
    #[serde(rename = "Image", default)]
    pub image: String,
}

/// Outgoing employee body for create and update. `password` is omitted from
/// the wire when `None` (kept unchanged by the backend on update).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EmployeeForm {
    #[serde(rename = "hoVaTen")]
    pub full_name: String,
    #[serde(rename = "username")]
    pub username: String,
    #[serde(rename = "password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "email")]
    pub email: String,
    #[serde(rename = "chucVu")]
    pub position: String,
    #[serde(rename = "phong")]
    pub department: String,
    #[serde(rename = "phanQuyen")]
    pub role_tag: String,
    #[serde(rename = "quyenXem")]
    pub can_view: bool,
    #[serde(rename = "quyenThem")]
    pub can_create: bool,
    #[serde(rename = "quyenSua")]
    pub can_edit: bool,
    #[serde(rename = "quyenXoa")]
    pub can_delete: bool,
    #[serde(rename = "trangThai")]
    pub active: bool,
    #[serde(rename = "image")]
    pub image: String,
}

/// One month's bucket in the posts-by-month series.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MonthlyBucket {
    #[serde(rename = "Thang", default)]
    pub month: i64,
    #[serde(rename = "Nam", default)]
    pub year: i64,
    #[serde(rename = "SoBaiViet", default)]
    pub posts: i64,
    #[serde(rename = "TongLuotXem", default)]
    pub views: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CategoryBucket {
    #[serde(rename = "TenDanhMuc", default)]
    pub name: String,
    #[serde(rename = "SoBaiViet", default)]
    pub posts: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AuthorBucket {
    #[serde(rename = "HoVaTen", default)]
    pub name: String,
    #[serde(rename = "SoBaiViet", default)]
    pub posts: i64,
    #[serde(rename = "TongLuotXem", default)]
    pub views: i64,
}

/// Month-over-month counters for the headline tiles.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GrowthStats {
    #[serde(rename = "BaiVietThangNay", default)]
    pub posts_this_month: i64,
    #[serde(rename = "BaiVietThangTruoc", default)]
    pub posts_last_month: i64,
    #[serde(rename = "LuotXemThangNay", default)]
    pub views_this_month: i64,
    #[serde(rename = "LuotXemThangTruoc", default)]
    pub views_last_month: i64,
}

/// The dashboard statistics payload. Every series defaults to empty so a
/// partial reply still renders.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DashboardStats {
    #[serde(rename = "latestPosts", default)]
    pub latest_posts: Vec<Post>,
    #[serde(rename = "mostViewedPosts", default)]
    pub most_viewed_posts: Vec<Post>,
    #[serde(rename = "postsByCategory", default)]
    pub posts_by_category: Vec<CategoryBucket>,
    #[serde(rename = "postsByMonth", default)]
    pub posts_by_month: Vec<MonthlyBucket>,
    #[serde(rename = "topAuthors", default)]
    pub top_authors: Vec<AuthorBucket>,
    #[serde(rename = "growthStats", default)]
    pub growth: GrowthStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_decodes_sparse_reply() {
        let p: Post = serde_json::from_str(r#"{"BaiVietID":5,"TieuDe":"Hello","TieuDeKhongDau":"hello"}"#).unwrap();
        assert_eq!(p.id, 5);
        assert_eq!(p.slug, "hello");
        assert_eq!(p.status, 0);
        assert_eq!(p.category_id, None);
    }

    #[test]
    fn draft_serializes_backend_names() {
        let d = PostDraft { title: "T".into(), slug: "t".into(), status: post_status::PUBLIC, ..Default::default() };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v.get("tieuDe").and_then(|x| x.as_str()), Some("T"));
        assert_eq!(v.get("tieuDeKhongDau").and_then(|x| x.as_str()), Some("t"));
        assert_eq!(v.get("trangThai").and_then(|x| x.as_i64()), Some(1));
    }

    #[test]
    fn employee_form_omits_blank_password() {
        let f = EmployeeForm { username: "x".into(), ..Default::default() };
        let v = serde_json::to_value(&f).unwrap();
        assert!(v.get("password").is_none());
        let f2 = EmployeeForm { password: Some("secret".into()), ..Default::default() };
        let v2 = serde_json::to_value(&f2).unwrap();
        assert_eq!(v2.get("password").and_then(|x| x.as_str()), Some("secret"));
    }

    #[test]
    fn dashboard_defaults_every_series() {
        let s: DashboardStats = serde_json::from_str("{}").unwrap();
        assert!(s.latest_posts.is_empty());
        assert_eq!(s.growth.posts_this_month, 0);

        let s2: DashboardStats = serde_json::from_str(
            r#"{"postsByMonth":[{"Thang":3,"Nam":2025,"SoBaiViet":12,"TongLuotXem":340}],
                "growthStats":{"BaiVietThangNay":4,"BaiVietThangTruoc":2}}"#,
        ).unwrap();
        assert_eq!(s2.posts_by_month[0].month, 3);
        assert_eq!(s2.posts_by_month[0].views, 340);
        assert_eq!(s2.growth.posts_last_month, 2);
    }
}

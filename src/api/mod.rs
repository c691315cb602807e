//! Typed service layer over the gateway: one service per backend resource,
//! mirroring the console's screens. Services borrow the session store for
//! bearer tokens and the uploader for image side channels; every operation
//! returns the crate's common error type.

pub mod models;

mod auth;
mod posts;
mod categories;
mod employees;
mod statistics;

pub use auth::AuthService;
pub use categories::CategoriesService;
pub use employees::{EmployeeQuery, EmployeesService, PasswordChange, ProfileUpdate};
pub use posts::{slugify, PostQuery, PostsService};
pub use statistics::StatisticsService;

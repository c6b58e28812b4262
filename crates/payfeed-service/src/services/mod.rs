//! Business logic services
//!
//! Each service borrows the [`ServiceContext`] for the duration of a request
//! and orchestrates repositories, the media store, and the earnings calculator.

pub mod admin;
pub mod auth;
pub mod context;
pub mod error;
pub mod post;

pub use admin::AdminService;
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use post::{MediaUpload, PostService};

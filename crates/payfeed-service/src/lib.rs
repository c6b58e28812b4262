//! # payfeed-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(test)]
mod testing;

pub use services::{
    AdminService, AuthService, MediaUpload, PostService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};

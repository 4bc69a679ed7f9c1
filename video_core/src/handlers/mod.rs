//! HTTP handlers for the video endpoints

pub mod files;
pub mod routes;

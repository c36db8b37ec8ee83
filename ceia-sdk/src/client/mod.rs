//! HTTP transport and the authenticated request pipeline.

pub mod api;
pub mod core;

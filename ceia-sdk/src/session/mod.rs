//! Session persistence: the codec that turns a [`Session`](ceia_common::session::Session)
//! into an opaque blob, and the store that keeps that blob under one fixed key.

pub mod codec;
pub mod store;

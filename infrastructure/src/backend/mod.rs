//! HTTP adapter for the debate backend

pub mod http;
pub mod protocol;

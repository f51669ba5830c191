//! In-memory session state

pub mod session_store;

//! Use cases orchestrating the debate

pub mod orchestrator;
pub mod resume;
pub mod shared;
pub mod stream_turn;

#[cfg(test)]
pub(crate) mod testing;

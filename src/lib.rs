/// Error definitions
pub mod error;
/// Read-only access to the raw `GameParams` object graph
pub mod game_params;
/// Generic wrapper for values that may or may not match a known variant.
pub mod recognized;
/// The normalization engine: per-category unpackers and the run controller
pub mod unpack;

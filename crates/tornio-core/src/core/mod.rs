//! Operator-facing messaging

pub mod message;

//! Flutter-facing bindings for the Avec Ma core.

pub mod api;

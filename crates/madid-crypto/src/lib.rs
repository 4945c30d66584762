//! Identity hashing for multi-user device identity.
//!
//! An identified visitor's device id is the unsalted SHA-256 of their
//! account identifier, rendered as lowercase hex. The mapping is pure: the
//! same identifier yields the same device id in every process, forever, so
//! one account converges on one tracking identity across devices.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::{IdentityHash, IdentityHasher};

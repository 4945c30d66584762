//! Foundation types for multi-user device identity.
//!
//! This crate provides the identity, event, and temporal types shared by the
//! cookie store and the device identity resolver. Every other `madid` crate
//! depends on `madid-types`.
//!
//! # Key Types
//!
//! - [`VisitorIdentifier`] — Verified account identifier (e.g. an email) of an identified visitor
//! - [`DeviceId`] — The value persisted in a device cookie
//! - [`TrackedEvent`] — A tracking event; only its visitor identifier is consumed here
//! - [`Clock`] — Injectable time source used to compute cookie expiry

pub mod error;
pub mod event;
pub mod identity;
pub mod temporal;

pub use error::TypeError;
pub use event::{TrackedEvent, TrackedUser};
pub use identity::{DeviceId, VisitorIdentifier};
pub use temporal::{Clock, FixedClock, SystemClock};

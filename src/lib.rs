//! Anonymous notes for a named recipient, with a password-gated admin panel
//! for tracking which ones have been delivered.
//!
//! The core is the [`db::MessageStore`] over a single `messages` table and the
//! [`gate::AdminGate`] in front of the admin operations. Nothing is actually
//! delivered by this crate; fulfillment is a flag an admin flips by hand.

pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod gate;
pub mod logging;
pub mod models;
pub mod toggle;
pub mod validate;

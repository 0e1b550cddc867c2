//! # urnkit-urn
//!
//! Structured identifiers ("URNs") used as universal keys, and the binding
//! between those identifiers and the entity types they address.
//!
//! ## Design Principles
//!
//! - A URN is an immutable value; it can only be created through the
//!   validating factories on [`Urn`]
//! - Every URN has exactly one canonical string form, and parsing that form
//!   gives back an equal URN
//! - Equality and hashing agree, so URNs are safe map and set keys
//! - Entity types opt in to addressing by implementing [`SupportsUrn`]
//!
//! ## URN Format
//!
//! `{namespace}:{collection}:{encoded-identifier}`
//!
//! Examples:
//! - `acme:widgets:1`
//! - `acme:users:123e4567-e89b-12d3-a456-426614174000`
//! - `acme:calendars:c_18%40resource.example.com`
//!
//! The namespace and collection match `[A-Za-z0-9._%-]+`. The identifier is
//! either a hyphenated UUID or a percent-encoded opaque string; in both cases
//! it never contains a literal `:`.

mod binding;
mod error;
mod macros;
mod urn;

pub use binding::{
    ensure_urn_is_any_of, ensure_urn_is_for_type, find_by_urn, is_a, HasUrn, SupportsUrn, UrnKind,
};
pub use error::UrnError;
pub use urn::{derive_uuid, ensure_urn, to_urn_list, Urn, UrnInput, SEGMENT_GRAMMAR};

/// Re-export uuid for consumers building URNs from raw UUIDs
pub use uuid::Uuid;

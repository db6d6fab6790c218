//! Validation functionality
//!
//! Provides validation logic for:
//! - Relationship validation (containment soundness, reference cycles)
//! - Identifier validation (reserved SQL keywords, DDL syntax)

pub mod identifiers;
pub mod relationships;

pub use identifiers::{is_reserved_word, reserved_identifiers, validate_ddl};
pub use relationships::{RelationshipIssue, RelationshipValidationResult, RelationshipValidator};

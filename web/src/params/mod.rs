//! Typed parameters for endpoint inputs.
//!
//! Request bodies are deserialized into these structs before any handler logic
//! runs, so malformed input is rejected by the `Json` extractor.

pub(crate) mod message;

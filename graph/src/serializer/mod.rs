//! Serializers for graph instances.
//!
//! - **N-Triples** ([`ntriples`]): the forward index, one triple per line.

pub mod ntriples;

// GraphQL wire types for the Wiki.js `/graphql` endpoint
//
// Request envelopes and variable payloads live here together with the
// response shapes. Every response nests its payload under
// `data.authentication.<field>`.

pub mod queries;
pub mod types;

pub use types::*;

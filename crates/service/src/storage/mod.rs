//! Storage abstractions for service layer
//!
//! Contains reusable file-backed codecs so stores that persist a whole
//! collection as JSON share one load/save path.

pub mod json_list_store;

//! Response payloads served over plain HTTP.

pub mod response;

//! Data Transfer Objects for outbound communication
//!
//! DTOs here are serialized verbatim into requests sent to external
//! collaborators (currently the notification webhook).

pub mod notification;

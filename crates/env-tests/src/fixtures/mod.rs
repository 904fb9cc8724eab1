//! Test fixtures for interacting with the deployed responder.

pub mod responder_client;

pub use responder_client::{ClusterIdentity, ResponderClient, ResponderError};

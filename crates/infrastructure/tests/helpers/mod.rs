#![allow(dead_code)]

pub mod dns_server_mock;
pub mod mock_socket;
pub mod response_builder;

pub use dns_server_mock::MockDnsServer;
pub use mock_socket::{Reply, ScriptedTransport};
pub use response_builder::{query_id, question_type, ResponseBuilder};

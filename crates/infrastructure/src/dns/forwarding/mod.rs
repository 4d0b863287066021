pub mod message_builder;
pub mod response_parser;

pub use message_builder::{encode_query, MessageBuilder, HEADER_LEN};
pub use response_parser::{decode_response, header_id, DnsResponse, ResponseParser};

pub mod fetch;
pub mod request_gate;

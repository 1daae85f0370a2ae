pub mod control_api;
pub mod request;
pub mod response;
pub mod service;

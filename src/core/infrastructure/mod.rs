pub mod api_client;
mod http_control_api;
pub mod poller;

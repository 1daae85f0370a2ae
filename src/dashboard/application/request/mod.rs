pub mod access_request;
pub mod download_request;
pub mod instance_request;
pub mod server_request;

pub mod access_control;
pub mod action_dispatcher;
pub mod dashboard;
pub mod instance_registry;
pub mod log_viewer;
pub mod model_download;
pub mod server_control;
pub mod status_poller;

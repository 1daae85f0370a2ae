pub mod app_state;
pub mod ip_lists;
pub mod llm_instance;
pub mod log_source;
pub mod model_catalog;
pub mod server_stats;

pub mod action_reply;
pub mod listing_response;

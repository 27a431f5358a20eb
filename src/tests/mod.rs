mod api_admin;
pub mod common;
mod unit_content_models;

pub mod admin;
pub mod auth;
pub mod extract;
pub mod site;

pub mod env_config;
pub mod error;
pub mod http;
pub mod jwt;
pub mod password;
pub mod permissions;
pub mod plans;
pub mod stripe;
pub mod token;

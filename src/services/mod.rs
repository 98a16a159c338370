pub mod account_service;
pub mod credential_service;
pub mod health_service;
pub mod token_service;

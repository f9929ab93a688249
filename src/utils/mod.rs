pub mod crypto;
pub mod time;
pub mod token;
pub mod upload;
pub mod validation;

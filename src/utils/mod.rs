pub mod crypto;
pub mod otp;
pub mod token;
pub mod validation;

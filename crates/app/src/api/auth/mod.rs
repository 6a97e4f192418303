pub mod login;
pub mod signup;
pub mod verify;

pub use login::{LoginRequest, LoginResponse};
pub use signup::SignupRequest;
pub use verify::{VerifyRequest, VerifyResponse};

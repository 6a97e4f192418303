pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Init, Login, Logout, Scrape, Shell, Signup, Team, Verify};

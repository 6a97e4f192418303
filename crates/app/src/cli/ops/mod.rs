pub mod init;
pub mod login;
pub mod logout;
pub mod scrape;
pub mod shell;
pub mod signup;
pub mod team;
pub mod verify;

pub use init::Init;
pub use login::Login;
pub use logout::Logout;
pub use scrape::Scrape;
pub use shell::Shell;
pub use signup::Signup;
pub use team::Team;
pub use verify::Verify;

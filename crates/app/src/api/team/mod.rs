pub mod all;
pub mod create;
pub mod get;
pub mod invite;
pub mod join;

pub use all::{AllTeamsRequest, AllTeamsResponse, TeamListing};
pub use create::CreateTeamRequest;
pub use get::{GetTeamRequest, GetTeamResponse};
pub use invite::InviteRequest;
pub use join::JoinTeamRequest;

//! Client for the route backend HTTP API.

mod backend;
mod client;
mod error;
mod types;

pub use backend::{RouteBackend, StatsBackend};
pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    ActionRequest, NumberList, PriorityUpdate, RouteAction, RouteDraft, RouteRecord,
    SignInRequest, SignInResponse, StatsEnvelope,
};

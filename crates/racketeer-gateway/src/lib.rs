//! # Racketeer Gateway
//!
//! Network side of the agent:
//!
//! - [`ApiGateway`]: bearer-authenticated JSON client for the game API,
//!   implementing [`racketeer_protocols::GameApi`]
//! - [`CharacterCache`]: throttled, coalescing cache of the character state
//!   shared by every automation loop

mod cache;
mod gateway;
mod stats;

pub use cache::CharacterCache;
pub use gateway::ApiGateway;
pub use reqwest::Method;
pub use stats::CacheStats;

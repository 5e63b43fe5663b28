//! # Racketeer Protocols
//!
//! Core protocol definitions for the Racketeer automation agent.
//! Contains interface definitions and the plain data types that flow
//! between them - no network or timer code.
//!
//! ## Core Traits
//!
//! - [`GameApi`] - The remote game API as seen by the automation loops
//! - [`DomProbe`] - Query and click candidate elements in the live page
//! - [`SettingsProvider`] - Live, user-editable automation parameters

pub mod character;
pub mod dom;
pub mod error;
pub mod game;
pub mod settings;

pub use character::CharacterState;
pub use dom::{DomProbe, ElementInfo};
pub use error::{ApiError, ProbeError};
pub use game::{ActionKind, ActionOutcome, GameApi, TrainOutcome, TrainingStat};
pub use settings::{AutomationSettings, ResourceCosts, SettingsProvider};

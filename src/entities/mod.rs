//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables. Each entity has a Model
//! struct for data and an Entity struct for operations.

pub mod lixi_config;
pub mod lixi_greeting;
pub mod user;

// Re-export specific types to avoid conflicts
pub use lixi_config::{
    Column as LixiConfigColumn, Entity as LixiConfig, Model as LixiConfigModel,
};
pub use lixi_greeting::{
    Column as LixiGreetingColumn, Entity as LixiGreeting, Model as LixiGreetingModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};

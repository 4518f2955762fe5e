//! User identity model.

mod model;

pub use model::User;

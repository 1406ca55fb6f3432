mod app;
pub mod components;
pub mod environment;
pub mod error;
pub mod helper;
pub mod map;
pub mod routes;
pub mod selectors;
pub mod store;

pub use app::run;
pub use components::root::{Action, RootReducer, RootState, RootStore};
pub use environment::Environment;
pub use error::ApiError;

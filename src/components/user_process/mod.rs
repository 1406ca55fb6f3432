mod reducer;

pub use reducer::{reduce, UserAction, UserState};

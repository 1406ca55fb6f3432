mod reducer;

use crate::environment::Environment;
use crate::store::{Effect, Reducer};

pub use reducer::{reduce, Action, RootState};

pub type RootStore = crate::store::Store<RootReducer>;

pub struct RootReducer;

impl Reducer for RootReducer {
    type Action = Action;

    type State = RootState;

    type Environment = Environment;

    fn reduce(
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action> {
        reduce(action, state, environment)
    }

    fn initial_action() -> Option<Self::Action> {
        Some(Action::Initialize)
    }
}

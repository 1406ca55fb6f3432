use crate::components::data_process::{self, DataAction, DataState};
use crate::components::user_process::{self, UserAction, UserState};
use crate::environment::Environment;
use crate::routes::AppRoute;
use crate::store::Effect;

#[derive(Debug, Clone)]
pub enum Action {
    /// Check the stored session and load the offers
    Initialize,
    Data(DataAction),
    User(UserAction),
    /// The pending redirect was followed
    RedirectHandled,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct RootState {
    pub data: DataState,
    pub user: UserState,
    /// Set when an action needs a different route, e.g. an unauthorized
    /// favorite toggle
    pub redirect: Option<AppRoute>,
}

pub fn reduce(action: Action, state: &mut RootState, environment: &Environment) -> Effect<Action> {
    log::trace!("{action:?}");
    match action {
        Action::Initialize => Effect::merge2(
            Effect::action(Action::User(UserAction::CheckSession)),
            Effect::action(Action::Data(DataAction::FetchOffers)),
        ),
        Action::Data(DataAction::ToggleFavorite(id, _))
            if !state.user.authorization_status.is_auth() =>
        {
            log::debug!("Favorite {id} needs login");
            state.redirect = Some(AppRoute::Login);
            Effect::NONE
        }
        Action::Data(action) => {
            data_process::reduce(action, &mut state.data, environment).map(Action::Data)
        }
        Action::User(action) => {
            let follow_up = match &action {
                UserAction::SessionChecked(Ok(_)) | UserAction::LoggedIn(Ok(_)) => {
                    Some(DataAction::FetchFavorites)
                }
                UserAction::Logout => Some(DataAction::ClearFavorites),
                _ => None,
            };
            let effect = user_process::reduce(action, &mut state.user, environment).map(Action::User);
            match follow_up {
                Some(data) => Effect::merge2(effect, Effect::action(Action::Data(data))),
                None => effect,
            }
        }
        Action::RedirectHandled => {
            state.redirect = None;
            Effect::NONE
        }
    }
}

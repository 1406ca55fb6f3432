use crate::environment::types::{AuthInfo, AuthorizationStatus, Credentials};
use crate::environment::Environment;
use crate::error::ApiError;
use crate::store::Effect;

#[derive(Debug, Clone)]
pub enum UserAction {
    CheckSession,
    SessionChecked(Result<AuthInfo, ApiError>),
    Login(Credentials),
    LoggedIn(Result<AuthInfo, ApiError>),
    Logout,
    ClearError,
}

#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct UserState {
    pub authorization_status: AuthorizationStatus,
    pub user: Option<AuthInfo>,
    /// The message shown on the login form after a failed attempt
    pub error_message: Option<String>,
    pub logging_in: bool,
}

impl UserState {
    fn authorized(&mut self, info: AuthInfo) {
        self.authorization_status = AuthorizationStatus::Auth;
        self.user = Some(info);
    }

    fn unauthorized(&mut self) {
        self.authorization_status = AuthorizationStatus::NoAuth;
        self.user = None;
    }
}

pub fn reduce(action: UserAction, state: &mut UserState, environment: &Environment) -> Effect<UserAction> {
    log::trace!("{action:?}");
    let model = environment.model.clone();
    match action {
        UserAction::CheckSession => Effect::future(
            async move { model.check_session().await },
            UserAction::SessionChecked,
        ),
        UserAction::SessionChecked(result) => {
            match result {
                Ok(info) => state.authorized(info),
                Err(e) => {
                    log::debug!("No session: {e}");
                    state.unauthorized();
                }
            }
            Effect::NONE
        }
        UserAction::Login(credentials) => {
            state.logging_in = true;
            state.error_message = None;
            Effect::future(
                async move { model.login(&credentials).await },
                UserAction::LoggedIn,
            )
        }
        UserAction::LoggedIn(result) => {
            state.logging_in = false;
            match result {
                Ok(info) => {
                    if let Err(e) = environment.repository.set_token(&info.token) {
                        log::error!("Could not save token: {e}");
                    }
                    state.error_message = None;
                    state.authorized(info);
                }
                Err(e) => {
                    log::error!("Could not login: {e}");
                    state.error_message = Some(e.login_message());
                    state.unauthorized();
                }
            }
            Effect::NONE
        }
        UserAction::Logout => {
            if let Err(e) = environment.repository.clear_token() {
                log::error!("Could not clear token: {e}");
            }
            state.unauthorized();
            Effect::NONE
        }
        UserAction::ClearError => {
            state.error_message = None;
            Effect::NONE
        }
    }
}

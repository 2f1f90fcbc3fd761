use crate::context::Services;
use crate::error::ClientError;
use crate::routes::Route;
use crate::store::{Action, AuthAction, Store};
use crate::validate::{LoginForm, SignupForm};

/// Logs in, keeps the user in the session slice and both tokens on disk.
/// Returns where to go next.
pub fn login(services: &Services, store: &mut Store, form: &LoginForm) -> Result<Route, ClientError> {
    let request = services.report("login", form.validate())?;
    let response = services.report("login", services.backend.login(&request))?;

    services.backend.set_token(Some(response.access_token.clone()));
    let stored = services
        .db
        .store_tokens(&response.access_token, &response.refresh_token)
        .map_err(ClientError::from);
    services.report("store tokens", stored)?;

    let message = response
        .message
        .clone()
        .unwrap_or_else(|| format!("Welcome back {}", response.user.fullname));
    tracing::info!(user = %response.user.id, role = %response.user.role, "logged in");
    store.dispatch(Action::Auth(AuthAction::SetUser(Some(response.user))));
    services.report("save session", services.persist(store))?;

    services.notifier.success(&message);
    Ok(Route::Home)
}

pub fn signup(services: &Services, form: &SignupForm) -> Result<Route, ClientError> {
    let request = services.report("signup", form.validate())?;
    let reply = services.report("signup", services.backend.register(&request))?;
    tracing::info!(email = %request.email, role = %request.role, "account created");
    services.notifier.success(&reply.message);
    Ok(Route::Login)
}

/// Ends the session. Local state is cleared even when the backend call fails,
/// since a stale token is the usual reason it does.
pub fn logout(services: &Services, store: &mut Store) -> Result<Route, ClientError> {
    let reply = services.report("logout", services.backend.logout());

    services.backend.set_token(None);
    store.dispatch(Action::Reset);
    // Both writes are attempted so disk never keeps a user the store has dropped.
    let cleared = services.report("clear tokens", services.db.clear_tokens().map_err(ClientError::from));
    let saved = services.report("save session", services.persist(store));
    cleared?;
    saved?;

    let reply = reply?;
    services.notifier.success(&reply.message);
    Ok(Route::Home)
}

use axum::{Router, routing::get};

use crate::modules::users::controller::{get_me, update_me};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me))
}

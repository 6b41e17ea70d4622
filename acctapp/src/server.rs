use acctctrl::platform::Platform;
use axum::{
    extract::Extension,
    routing::{
        get,
        post,
    },
    Router,
};

pub mod user;

/// The account administration API, to be nested by the caller.
pub fn router(platform: Platform) -> Router {
    Router::new()
        .route("/users", get(user::list_users).post(user::create_user))
        .route("/users/batch-delete", post(user::batch_delete_users))
        .route(
            "/users/{id}",
            get(user::show_user)
                .put(user::update_user)
                .patch(user::update_user)
                .delete(user::delete_user),
        )
        .layer(Extension(platform))
}

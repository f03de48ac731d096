use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::models::users::Role;
use crate::utils::sessions::{SessionStore, SESSION_COOKIE};

/// Identity of the authenticated user, resolved from the session cookie.
/// Used as an extractor in protected routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

/// Same resolution as `AuthUser`, but additionally requires the admin role.
/// Non-admins get 403 "Permission denied".
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

fn resolve_session(req: &HttpRequest) -> Result<AuthUser, Error> {
    // 1. Extract the session cookie
    let cookie = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => cookie,
        None => return Err(unauthorized("Unauthorized")),
    };

    // 2. Look up the token in the server-side session store
    let store = match req.app_data::<web::Data<SessionStore>>() {
        Some(store) => store,
        None => {
            let response = HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Session store not configured"
            }));
            return Err(actix_web::error::InternalError::from_response("", response).into());
        }
    };

    let session = match store.get(cookie.value()) {
        Some(session) => session,
        None => return Err(unauthorized("Unauthorized")),
    };

    Ok(AuthUser {
        user_id: session.user_id,
        username: session.username,
        role: session.role,
    })
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_session(req))
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = match resolve_session(req) {
            Ok(user) => user,
            Err(e) => return ready(Err(e)),
        };

        if user.role != Role::Admin {
            let response = HttpResponse::Forbidden().json(serde_json::json!({
                "error": "Permission denied"
            }));
            return ready(Err(
                actix_web::error::InternalError::from_response("", response).into()
            ));
        }

        ready(Ok(AdminUser(user)))
    }
}

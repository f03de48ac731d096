use actix_web::{cookie::Cookie, delete, get, post, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use validator::Validate;

use crate::models::users::Role;
use crate::services::account_service::AccountService;
use crate::utils::{password, sessions::{SessionStore, SESSION_COOKIE}};

// Registration DTO
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Login DTO
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Account-deletion DTO (re-authentication by credentials)
#[derive(Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Message shown instead of confirming that an email belongs to a deleted
// account.
const DELETED_ACCOUNT_MESSAGE: &str = "Unknown error! Contact our team at support@support.com";

/// POST /api/auth/register - Create an account plus its starting balance (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    // 1. Reject duplicate or soft-deleted email
    match AccountService::find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(existing)) => {
            if !existing.is_active() {
                // Do not reveal that this email once had an account
                return HttpResponse::Conflict().json(serde_json::json!({
                    "error": DELETED_ACCOUNT_MESSAGE
                }));
            }
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "User with this email already exists"
            }));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up email");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Database error"
            }));
        }
    }

    // 2. Reject duplicate username
    match AccountService::find_by_username(db.get_ref(), &body.username).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "User with this username already exists"
            }));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up username");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Database error"
            }));
        }
    }

    // 3. Hash the password
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "Failed to hash password");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to hash password"
            }));
        }
    };

    // 4. Create user + balance in one transaction
    match AccountService::create_account(
        db.get_ref(),
        &body.username,
        &body.email,
        &password_hash,
        Role::User,
    )
    .await
    {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "message": "User registered successfully"
        })),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create user"
            }))
        }
    }
}

/// POST /api/auth/login - Authenticate and establish a cookie session (PUBLIC)
#[post("/login")]
pub async fn login(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    sessions: web::Data<SessionStore>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    // Invalidate whatever session the request already carries
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        sessions.remove(cookie.value());
    }

    // 1. Find the user
    let user = match AccountService::find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid email or password"
            }));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up user");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Database error"
            }));
        }
    };

    // 2. Verify the password
    let is_valid = match password::verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!(error = %e, "Password verification error");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Password verification error"
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid email or password"
        }));
    }

    // 3. Soft-deleted accounts cannot log back in
    if !user.is_active() {
        return HttpResponse::Conflict().json(serde_json::json!({
            "error": DELETED_ACCOUNT_MESSAGE
        }));
    }

    // 4. Create the server-side session and hand out the cookie
    let token = sessions.create(user.id, &user.username, user.role);
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "message": "Logged in successfully"
    }))
}

/// GET /api/auth/logout - Drop the session and expire the cookie
#[get("/logout")]
pub async fn logout(req: HttpRequest, sessions: web::Data<SessionStore>) -> HttpResponse {
    let cookie = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => cookie,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "No active user"
            }));
        }
    };

    if sessions.remove(cookie.value()).is_none() {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": "No active user"
        }));
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();

    HttpResponse::Ok().cookie(removal).json(serde_json::json!({
        "message": "Logged out successfully"
    }))
}

/// DELETE /api/auth/delete-account - Soft-delete after credential re-check.
/// Purchase history and reviews of the account survive.
#[delete("/delete-account")]
pub async fn delete_account(
    body: web::Json<DeleteAccountRequest>,
    db: web::Data<DatabaseConnection>,
    sessions: web::Data<SessionStore>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        tracing::warn!(error = %e, "Invalid delete-account payload");
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }

    let user = match AccountService::find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "User not found"
            }));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up user");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Database error"
            }));
        }
    };

    match password::verify_password(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid password"
            }));
        }
        Err(e) => {
            tracing::error!(error = %e, "Password verification error");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Password verification error"
            }));
        }
    }

    if !user.is_active() {
        tracing::warn!(user_id = user.id, "Account has already been deleted");
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Account has already been deleted"
        }));
    }

    let user_id = user.id;
    match AccountService::soft_delete(db.get_ref(), user).await {
        Ok(_) => {
            // Revoke every live session of the account
            sessions.remove_user(user_id);
            tracing::info!(user_id, "Account is successfully deleted");
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Account is successfully deleted"
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete account");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to delete account"
            }))
        }
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(logout)
            .service(delete_account),
    );
}

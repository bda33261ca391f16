//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::domain::{Role, User};
use quill_core::ports::{PasswordService, TokenService};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::handlers::convert::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const PASSWORD_MIN: usize = 6;

fn auth_response(
    user: &User,
    token_service: &Arc<dyn TokenService>,
) -> Result<AuthResponse, AppError> {
    let token = token_service
        .generate_token(user.id, user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        user: user_response(user),
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let name = req.name.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if req.password.len() < PASSWORD_MIN {
        return Err(AppError::Validation(format!(
            "Password must be at least {PASSWORD_MIN} characters"
        )));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".to_string()));
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let role = Role::from_requested(req.role.as_deref());
    let user = User::new(name, email, password_hash, role);

    // The unique index on email is the authoritative guard; a concurrent
    // registration loses here even after the lookup above passed.
    let saved = match state.users.insert(user).await {
        Ok(saved) => saved,
        Err(quill_core::error::RepoError::Constraint(_)) => {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %saved.id, role = saved.role.as_str(), "User registered");

    Ok(HttpResponse::Created().json(auth_response(&saved, &token_service)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();

    // Unknown email and wrong password answer identically.
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(auth_response(&user, &token_service)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use quill_db::Database;
use quill_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::convert;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::BadRequest("username must be 3-32 characters".into()));
    }
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("invalid email address".into()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest("password must be at least 8 characters".into()));
    }

    if state.db.get_user_by_username(&req.username)?.is_some() {
        return Err(ApiError::Conflict("username already taken".into()));
    }
    if state.db.get_user_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict("email already registered".into()));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hash failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();

    state
        .db
        .create_user(&user_id.to_string(), &req.username, &req.email, &password_hash)?;

    let token = create_token(&state.jwt_secret, user_id, &req.username)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_username(&req.username)?
        .ok_or(ApiError::Unauthorized)?;

    // Verify password
    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|e| anyhow::anyhow!("bad stored hash: {}", e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("bad user id: {}", e))?;

    let token = create_token(&state.jwt_secret, user_id, &user.username)?;

    Ok(Json(LoginResponse {
        user_id,
        username: user.username,
        token,
    }))
}

/// Puts the token's `jti` on the denylist; the middleware refuses it from
/// then on. Entries for tokens that have expired anyway are purged here.
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let now = chrono::Utc::now().timestamp();
    state.db.purge_expired_tokens(now)?;
    state.db.revoke_token(&claims.jti.to_string(), claims.exp as i64)?;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}

pub async fn current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(convert::user(row)?))
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        jti: Uuid::new_v4(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    fn state() -> AppState {
        Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "test-secret".into(),
        })
    }

    fn register_req(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: format!("{}@example.com", username),
            password: "hunter2hunter2".into(),
        }
    }

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_token("s3cret", user_id, "alice").unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"s3cret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, user_id);
        assert_eq!(data.claims.username, "alice");
    }

    #[tokio::test]
    async fn register_then_login() {
        let state = state();

        let res = register(State(state.clone()), Json(register_req("alice")))
            .await
            .unwrap()
            .into_response();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".into(),
                password: "hunter2hunter2".into(),
            }),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(res.status(), StatusCode::OK);

        let err = login(
            State(state),
            Json(LoginRequest {
                username: "alice".into(),
                password: "wrong-password".into(),
            }),
        )
        .await
        .err().unwrap();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let state = state();

        register(State(state.clone()), Json(register_req("alice")))
            .await
            .unwrap();

        let err = register(State(state.clone()), Json(register_req("alice")))
            .await
            .err().unwrap();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Same email, different username
        let err = register(
            State(state),
            Json(RegisterRequest {
                username: "alice2".into(),
                email: "alice@example.com".into(),
                password: "hunter2hunter2".into(),
            }),
        )
        .await
        .err().unwrap();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejects_weak_input() {
        let state = state();

        let err = register(
            State(state.clone()),
            Json(RegisterRequest {
                username: "al".into(),
                email: "al@example.com".into(),
                password: "hunter2hunter2".into(),
            }),
        )
        .await
        .err().unwrap();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = register(
            State(state),
            Json(RegisterRequest {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "short".into(),
            }),
        )
        .await
        .err().unwrap();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let state = state();

        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".into(),
            jti: Uuid::new_v4(),
            exp: (chrono::Utc::now() + chrono::Duration::days(1)).timestamp() as usize,
        };

        assert!(!state.db.is_token_revoked(&claims.jti.to_string()).unwrap());

        logout(State(state.clone()), Extension(claims.clone()))
            .await
            .unwrap();

        assert!(state.db.is_token_revoked(&claims.jti.to_string()).unwrap());
    }

    #[tokio::test]
    async fn current_user_returns_fresh_row() {
        let state = state();

        let user_id = Uuid::new_v4();
        state
            .db
            .create_user(&user_id.to_string(), "alice", "alice@example.com", "hash")
            .unwrap();

        let claims = Claims {
            sub: user_id,
            username: "alice".into(),
            jti: Uuid::new_v4(),
            exp: 0,
        };

        let res = current_user(State(state), Extension(claims))
            .await
            .unwrap()
            .into_response();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

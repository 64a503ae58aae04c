//! Authentication service for user registration, login, and token issuance

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::{User, UserRole};
use shared::types::Language;
use shared::validation::{validate_email, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// Input for registering a user. The first registered user becomes the
/// admin; everyone after that is an employee.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub preferred_language: Option<Language>,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Response after successful registration or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    preferred_language: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::Internal(format!("Unknown role: {}", self.role)))?;
        let preferred_language = match self.preferred_language.as_str() {
            "en" => Language::English,
            _ => Language::Thai,
        };
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            preferred_language,
            created_at: self.created_at,
        })
    }
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Register a user
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "name is required".to_string(),
                message_th: "ต้องระบุ name".to_string(),
            });
        }
        if let Err(msg) = validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
                message_th: "รูปแบบอีเมลไม่ถูกต้อง".to_string(),
            });
        }
        if let Err(msg) = validate_password(&input.password) {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: msg.to_string(),
                message_th: "รหัสผ่านต้องมีอย่างน้อย 8 ตัวอักษร".to_string(),
            });
        }

        // Check if the email is taken
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&input.email)
            .fetch_one(&self.db)
            .await?;
        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "user".to_string(),
                message: "Email already exists".to_string(),
                message_th: "อีเมลนี้มีผู้ใช้แล้ว".to_string(),
            });
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        // The first account administers the shop
        let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        let role = if user_count == 0 {
            UserRole::Admin
        } else {
            UserRole::Employee
        };

        let language = input.preferred_language.unwrap_or_default();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, role, preferred_language)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, preferred_language, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(language.code())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = %row.id, role = %role, "User registered");

        self.auth_response(row)
    }

    /// Log in with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, preferred_language, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.auth_response(row)
    }

    /// The acting user, for `/auth/me`
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, preferred_language, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_user()
    }

    fn auth_response(&self, row: UserRow) -> AppResult<AuthResponse> {
        let user = row.into_user()?;
        let access_token = self.issue_token(user.id, user.role)?;

        Ok(AuthResponse {
            user,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Decode and validate an access token
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        use jsonwebtoken::errors::ErrorKind;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }

    fn issue_token(&self, user_id: Uuid, role: UserRole) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}

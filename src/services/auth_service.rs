use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::auth::{
        ForgotPasswordRequest, LoginPayload, LoginRequest, ProfilePayload, ProfileRequest,
        RegisterRequest, UserList, UserPayload, provided,
    },
    entity::{
        Users,
        users::{ActiveModel as UserActive, Column as UserCol},
    },
    error::{AppError, AppResult, OrFail},
    middleware::auth::{AuthUser, sign_token},
    models::{Role, User},
    response::{ApiResponse, Empty},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// A stored hash that cannot be parsed never matches.
pub fn compare_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn require<'a>(value: &'a Option<String>, message: &str) -> AppResult<&'a str> {
    provided(value).ok_or_else(|| AppError::Validation(message.to_string()))
}

pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<UserPayload>> {
    let name = require(&payload.name, "Name is Required")?;
    let email = require(&payload.email, "Email is Required")?;
    let password = require(&payload.password, "Password is Required")?;
    let phone = require(&payload.phone, "Phone is Required")?;
    let address = require(&payload.address, "Address is Required")?;
    let answer = require(&payload.answer, "Answer is Required")?;

    let existing = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(state.db())
        .await
        .or_fail("Error in Registration")?;
    if existing.is_some() {
        return Err(AppError::Declined("Already registered, please login".into()));
    }

    let now = Utc::now().fixed_offset();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        email: Set(email.to_owned()),
        password: Set(hash_password(password)?),
        phone: Set(phone.to_owned()),
        address: Set(address.to_owned()),
        answer: Set(answer.to_owned()),
        role: Set(Role::Customer),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(state.db())
    .await
    .or_fail("Error in Registration")?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::created(
        "User Register Successfully",
        UserPayload { user: user.into() },
    ))
}

pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<LoginPayload>> {
    let (Some(email), Some(password)) = (provided(&payload.email), provided(&payload.password))
    else {
        return Err(AppError::NotFound("Invalid email or password".into()));
    };

    let user = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(state.db())
        .await
        .or_fail("Error in login")?
        .ok_or_else(|| AppError::NotFound("Email is not registered".into()))?;

    if !compare_password(password, &user.password) {
        return Err(AppError::Declined("Invalid Password".into()));
    }

    let token = sign_token(&state.jwt_secret, user.id)?;
    Ok(ApiResponse::success(
        "Login successfully",
        LoginPayload {
            user: user.into(),
            token,
        },
    ))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<Empty>> {
    let email = require(&payload.email, "Email is Required")?;
    let answer = require(&payload.answer, "Answer is Required")?;
    let new_password = require(&payload.new_password, "New Password is Required")?;

    let user = Users::find()
        .filter(UserCol::Email.eq(email))
        .filter(UserCol::Answer.eq(answer))
        .one(state.db())
        .await
        .or_fail("Something went wrong")?
        .ok_or_else(|| AppError::NotFound("Wrong Email Or Answer".into()))?;

    let mut active: UserActive = user.into();
    active.password = Set(hash_password(new_password)?);
    active.updated_at = Set(Utc::now().fixed_offset());
    active
        .update(state.db())
        .await
        .or_fail("Something went wrong")?;

    Ok(ApiResponse::success("Password Reset Successfully", Empty {}))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: ProfileRequest,
) -> AppResult<ApiResponse<ProfilePayload>> {
    const FAILED: &str = "Server Error - Failed to update profile.";

    let password = provided(&payload.password);
    if password.is_some_and(|p| p.len() < MIN_PASSWORD_LEN) {
        return Err(AppError::BadRequest(
            "Password needs to be at least 6 characters long.".into(),
        ));
    }

    let stored = Users::find_by_id(user.user_id)
        .one(state.db())
        .await
        .or_fail(FAILED)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let mut active: UserActive = stored.into();
    if let Some(name) = provided(&payload.name) {
        active.name = Set(name.to_owned());
    }
    if let Some(phone) = provided(&payload.phone) {
        active.phone = Set(phone.to_owned());
    }
    if let Some(address) = provided(&payload.address) {
        active.address = Set(address.to_owned());
    }
    if let Some(password) = password {
        active.password = Set(hash_password(password)?);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(state.db()).await.or_fail(FAILED)?;
    Ok(ApiResponse::success(
        "Profile updated successfully.",
        ProfilePayload {
            updated_user: updated.into(),
        },
    ))
}

/// Admins first, then newest accounts.
pub async fn all_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let data = Users::find()
        .order_by_desc(UserCol::Role)
        .order_by_desc(UserCol::CreatedAt)
        .all(state.db())
        .await
        .or_fail("Error while getting users.")?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success("All users", UserList { data }))
}

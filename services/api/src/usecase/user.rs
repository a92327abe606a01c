use chrono::Utc;
use uuid::Uuid;

use foodgram_domain::pagination::{PageRequest, Paginated};
use foodgram_domain::user::{MAX_USER_NAME_LEN, UserRole, is_valid_email, validate_username};

use crate::domain::repository::UserRepository;
use crate::domain::types::{Profile, User};
use crate::error::FoodgramError;
use crate::password::{hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

fn validate_password(password: &str) -> Result<(), FoodgramError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(FoodgramError::validation(
            "password must be at least 8 characters",
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(FoodgramError::validation(
            "password must be at most 128 characters",
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(FoodgramError::validation(
            "password must not be entirely numeric",
        ));
    }
    Ok(())
}

fn validate_person_name(field: &str, value: &str) -> Result<(), FoodgramError> {
    let len = value.trim().chars().count();
    if len == 0 || len > MAX_USER_NAME_LEN {
        return Err(FoodgramError::validation(format!(
            "{field} must be 1 to {MAX_USER_NAME_LEN} characters"
        )));
    }
    Ok(())
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, FoodgramError> {
        let email = input.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(FoodgramError::validation("invalid email"));
        }
        validate_username(&input.username)
            .map_err(|e| FoodgramError::validation(e.to_string()))?;
        validate_person_name("first_name", &input.first_name)?;
        validate_person_name("last_name", &input.last_name)?;
        validate_password(&input.password)?;

        if self.repo.username_exists(&input.username).await? {
            return Err(FoodgramError::UsernameTaken);
        }
        if self.repo.email_exists(&email).await? {
            return Err(FoodgramError::EmailTaken);
        }

        let user = User {
            id: Uuid::now_v7(),
            email,
            username: input.username,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            password_hash: hash_password(&input.password)?,
            is_active: true,
            role: UserRole::Normal,
            created_at: Utc::now(),
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Profile, FoodgramError> {
        self.repo
            .find_profile(id, viewer)
            .await?
            .ok_or(FoodgramError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Paginated<Profile>, FoodgramError> {
        self.repo.list_profiles(viewer, page.clamped()).await
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct SetPasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SetPasswordUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, input: SetPasswordInput) -> Result<(), FoodgramError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(FoodgramError::UserNotFound)?;
        if !verify_password(&input.current_password, &user.password_hash) {
            return Err(FoodgramError::InvalidPassword);
        }
        validate_password(&input.new_password)?;
        let hash = hash_password(&input.new_password)?;
        self.repo.update_password_hash(user_id, &hash).await
    }
}

//! Signup and login.

use std::sync::Arc;

use crate::domain::User;
use crate::error::DomainError;
use crate::forms::{self, FormErrors, NON_FIELD, REQUIRED};
use crate::ports::{PasswordService, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct SignupSubmission {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginSubmission {
    pub username: String,
    pub password: String,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new account.
    pub async fn signup(&self, submission: SignupSubmission) -> Result<User, DomainError> {
        let username = submission.username.trim();
        let mut errors = FormErrors::new();

        forms::validate_username(username, &mut errors);
        if !errors.has("username") && self.users.find_by_username(username).await?.is_some() {
            errors.add("username", "A user with that username already exists.");
        }

        if submission.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else if submission.password1.chars().count() < 8 {
            errors.add(
                "password1",
                "This password is too short. It must contain at least 8 characters.",
            );
        }
        if submission.password2 != submission.password1 {
            errors.add("password2", "The two password fields didn't match.");
        }
        errors.into_result().map_err(DomainError::Invalid)?;

        let hash = self
            .passwords
            .hash(&submission.password1)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self.users.save(User::new(username, hash)).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials and return the matching user.
    pub async fn login(&self, submission: LoginSubmission) -> Result<User, DomainError> {
        let mut errors = FormErrors::new();
        if submission.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if submission.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result().map_err(DomainError::Invalid)?;

        let user = self.users.find_by_username(submission.username.trim()).await?;
        let verified = match &user {
            Some(user) => self
                .passwords
                .verify(&submission.password, &user.password_hash)
                .map_err(|e| DomainError::Internal(e.to_string()))?,
            None => false,
        };

        match user {
            Some(user) if verified => Ok(user),
            _ => {
                let mut errors = FormErrors::new();
                errors.add(
                    NON_FIELD,
                    "Please enter a correct username and password. Note that both fields may be case-sensitive.",
                );
                Err(DomainError::Invalid(errors))
            }
        }
    }
}

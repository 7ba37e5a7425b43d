//! # Yatube Shared
//!
//! Payload types deserialized from HTML forms and query strings.

pub mod dto;

pub use dto::{CommentForm, LoginForm, NextQuery, PageQuery, PostForm, SignupForm};

//! # services
//!
//! Business services for PostHub. Each service fetches required entities through
//! `domains::lookup` and raises `AppError`s for rule violations; everything else
//! (persistence, hashing, tokens) comes in through the ports.

pub mod comment_service;
pub mod dto;
pub mod post_service;
pub mod user_service;

#[cfg(test)]
mod test_support;

pub use comment_service::CommentService;
pub use post_service::PostService;
pub use user_service::UserService;

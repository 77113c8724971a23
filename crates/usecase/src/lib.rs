//! `usecase` crate — business rules for articles.
//!
//! Wraps every repository call in a deadline-bounded [`Context`] and
//! enforces the rules that span more than one repository call (title
//! uniqueness on create, existence before delete).

pub mod article;
pub mod context;
pub mod error;

pub use article::{ArticleUsecase, DEFAULT_TIMEOUT};
pub use context::Context;
pub use error::{ArticleError, ErrorKind};

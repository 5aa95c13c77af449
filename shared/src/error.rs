//! Error codes for the storefront core
//!
//! Standardized error categories with the user-visible messages the UI
//! layer is allowed to show. Lower layers keep their own error enums;
//! everything that reaches the user is mapped through one of these
//! categories first.

/// Standard storefront error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Missing or invalid user input (recovered locally)
    Validation,
    /// Local storage read/write failure
    Persistence,
    /// Remote data service failure (retry-capable)
    Backend,
    /// Requested record does not exist
    NotFound,
}

impl StoreErrorCode {
    /// Get the default user-visible message for this category
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please fill all required fields",
            Self::Persistence => "Could not access local storage",
            Self::Backend => "Something went wrong, please try again",
            Self::NotFound => "Not found",
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "E0001",
            Self::Persistence => "E0002",
            Self::Backend => "E0003",
            Self::NotFound => "E0004",
        }
    }
}

impl std::fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that may be shown to the user
///
/// Implementors map themselves to a [`StoreErrorCode`]; the UI shows
/// `user_message()` and nothing else. Raw backend errors must never
/// reach the user unmapped.
pub trait UserFacingError: std::error::Error {
    /// The category this error falls into
    fn code(&self) -> StoreErrorCode;

    /// The message the UI is allowed to display
    fn user_message(&self) -> String {
        self.code().default_message().to_string()
    }
}

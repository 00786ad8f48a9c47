//! Domain identifier types with proper encapsulation.
//!
//! The backing store generates row IDs (UUIDs) server-side, so these
//! newtypes wrap the string form rather than minting values themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// The inner String is private to ensure all construction goes through
        /// the defined constructors.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id! {
    /// Course module identifier.
    ModuleId
}

string_id! {
    /// Topic identifier.
    TopicId
}

string_id! {
    /// Lesson identifier.
    LessonId
}

string_id! {
    /// Forum post identifier.
    PostId
}

string_id! {
    /// Forum comment identifier.
    CommentId
}

string_id! {
    /// User (profile) identifier.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_id_new_and_as_str() {
        let id = ModuleId::new("mod-1");
        assert_eq!(id.as_str(), "mod-1");
    }

    #[test]
    fn user_id_from_string_and_display() {
        let id = UserId::from("u-42".to_string());
        assert_eq!(format!("{id}"), "u-42");
    }

    #[test]
    fn post_id_equality() {
        assert_eq!(PostId::from("p"), PostId::new("p"));
        assert_ne!(PostId::from("p"), PostId::new("q"));
    }
}

//! Admin Session Guard

use smallvec::SmallVec;

/// Addresses allowed into the back-office.
pub const ADMIN_EMAILS: [&str; 2] = [
    "marianafreitessantana@iresm.edu.ar",
    "renataregaldo@iresm.edu.ar",
];

/// A signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    /// Account email, when the provider exposes one.
    pub email: Option<String>,
}

impl Identity {
    /// Identity for an email account.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

/// Fixed set of admin emails.
#[derive(Debug, Clone)]
pub struct AdminAllowList {
    emails: SmallVec<[String; 2]>,
}

impl AdminAllowList {
    /// Allow-list with the given emails.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|email| normalize(email.as_ref()))
                .collect(),
        }
    }

    /// Whether `email` is an admin.
    pub fn allows(&self, email: &str) -> bool {
        let email = normalize(email);

        !email.is_empty() && self.emails.contains(&email)
    }
}

impl AdminAllowList {
    /// The given emails, or the built-in admins when none are given.
    pub fn or_default(emails: &[String]) -> Self {
        if emails.iter().all(|email| email.trim().is_empty()) {
            Self::default()
        } else {
            Self::new(emails.iter().filter(|email| !email.trim().is_empty()))
        }
    }
}

impl Default for AdminAllowList {
    fn default() -> Self {
        Self::new(ADMIN_EMAILS)
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// What the back-office shows for the current identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAccess {
    /// Nobody signed in: show the login form.
    Unauthenticated,

    /// Signed in but not an admin: show an error and offer sign-out.
    AuthenticatedUnauthorized {
        /// Email of the signed-in account, if any.
        email: Option<String>,
    },

    /// Signed in as an admin: show inventory management.
    AuthenticatedAuthorized {
        /// Admin email.
        email: String,
    },
}

impl SessionAccess {
    /// Classify an identity against the allow-list.
    pub fn classify(identity: Option<&Identity>, allow_list: &AdminAllowList) -> Self {
        let Some(identity) = identity else {
            return Self::Unauthenticated;
        };

        match identity.email.as_deref() {
            Some(email) if allow_list.allows(email) => Self::AuthenticatedAuthorized {
                email: email.to_string(),
            },
            email => Self::AuthenticatedUnauthorized {
                email: email.map(str::to_string),
            },
        }
    }

    /// Whether inventory management is available.
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::AuthenticatedAuthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> AdminAllowList {
        AdminAllowList::new(["admin@cafe.test"])
    }

    #[test]
    fn no_identity_is_unauthenticated() {
        assert_eq!(
            SessionAccess::classify(None, &allow_list()),
            SessionAccess::Unauthenticated
        );
    }

    #[test]
    fn unknown_email_is_unauthorized_even_when_signed_in() {
        let identity = Identity::with_email("customer@cafe.test");

        assert_eq!(
            SessionAccess::classify(Some(&identity), &allow_list()),
            SessionAccess::AuthenticatedUnauthorized {
                email: Some("customer@cafe.test".to_string())
            }
        );
    }

    #[test]
    fn identity_without_email_is_unauthorized() {
        let access = SessionAccess::classify(Some(&Identity::default()), &allow_list());

        assert_eq!(
            access,
            SessionAccess::AuthenticatedUnauthorized { email: None }
        );
    }

    #[test]
    fn allowed_email_matches_case_insensitively() {
        let identity = Identity::with_email(" Admin@Cafe.Test ");
        let access = SessionAccess::classify(Some(&identity), &allow_list());

        assert!(access.is_authorized());
    }

    #[test]
    fn configured_emails_replace_the_built_in_admins() {
        let list = AdminAllowList::or_default(&["ops@cafe.test".to_string()]);

        assert!(list.allows("OPS@cafe.test"));
        assert!(!list.allows("renataregaldo@iresm.edu.ar"));

        let fallback = AdminAllowList::or_default(&[String::new()]);

        assert!(fallback.allows("marianafreitessantana@iresm.edu.ar"));
    }

    #[test]
    fn default_list_is_not_empty() {
        let list = AdminAllowList::default();

        assert!(list.allows("renataregaldo@iresm.edu.ar"));
        assert!(!list.allows(""));
    }
}

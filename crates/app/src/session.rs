//! Admin session.

use std::sync::Arc;

use tracing::{info, warn};
use zeroize::Zeroizing;

use cafe::admin::{AdminAllowList, SessionAccess};

use crate::{errors::AppError, identity::IdentityProvider};

/// Guards the back-office behind sign-in and the admin allow-list.
#[derive(Debug, Clone)]
pub struct AdminSession {
    identity: Arc<dyn IdentityProvider>,
    allow_list: AdminAllowList,
}

impl AdminSession {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, allow_list: AdminAllowList) -> Self {
        Self {
            identity,
            allow_list,
        }
    }

    /// Classify whoever is signed in right now.
    pub async fn access(&self) -> SessionAccess {
        let identity = self.identity.current().await;

        SessionAccess::classify(identity.as_ref(), &self.allow_list)
    }

    /// Sign in and return the resulting access.
    ///
    /// A successful sign-in of a non-admin account is not an error; the
    /// returned access says what the account may see.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignIn`] when the provider rejects the credentials.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &Zeroizing<String>,
    ) -> Result<SessionAccess, AppError> {
        let identity = self
            .identity
            .sign_in(email, password.as_str())
            .await
            .inspect_err(|err| warn!(error = %err, "sign-in failed"))?;

        let access = SessionAccess::classify(Some(&identity), &self.allow_list);

        if !access.is_authorized() {
            warn!(email = ?identity.email, "signed-in account is not an admin");
        }

        Ok(access)
    }

    /// Sign out of the provider.
    pub async fn sign_out(&self) {
        self.identity.sign_out().await;

        info!("admin session closed");
    }

    /// Email of the signed-in admin.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] when nobody is signed in and
    /// [`AppError::Forbidden`] for a non-admin account.
    pub async fn require_admin(&self) -> Result<String, AppError> {
        match self.access().await {
            SessionAccess::AuthenticatedAuthorized { email } => Ok(email),
            SessionAccess::AuthenticatedUnauthorized { .. } => Err(AppError::Forbidden),
            SessionAccess::Unauthenticated => Err(AppError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use cafe::admin::Identity;

    use crate::identity::{FixedIdentity, IdentityError, MockIdentityProvider};

    use super::*;

    fn session(identity: impl IdentityProvider + 'static) -> AdminSession {
        AdminSession::new(Arc::new(identity), AdminAllowList::new(["admin@cafe.test"]))
    }

    fn password(value: &str) -> Zeroizing<String> {
        Zeroizing::new(value.to_string())
    }

    #[tokio::test]
    async fn nobody_signed_in_is_unauthenticated() {
        let session = session(FixedIdentity::new());

        assert_eq!(session.access().await, SessionAccess::Unauthenticated);
        assert!(matches!(
            session.require_admin().await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn admin_sign_in_grants_access() -> TestResult {
        let session = session(FixedIdentity::new());

        let access = session
            .sign_in("Admin@Cafe.test", &password("secret"))
            .await?;

        assert!(access.is_authorized());
        assert_eq!(session.require_admin().await?, "Admin@Cafe.test");

        session.sign_out().await;

        assert_eq!(session.access().await, SessionAccess::Unauthenticated);

        Ok(())
    }

    #[tokio::test]
    async fn other_accounts_are_forbidden() -> TestResult {
        let session = session(FixedIdentity::new());

        let access = session
            .sign_in("guest@cafe.test", &password("secret"))
            .await?;

        assert_eq!(
            access,
            SessionAccess::AuthenticatedUnauthorized {
                email: Some("guest@cafe.test".to_string())
            }
        );
        assert!(matches!(
            session.require_admin().await,
            Err(AppError::Forbidden)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn identity_without_email_is_forbidden() {
        let session = session(FixedIdentity::signed_in(Identity::default()));

        assert!(matches!(
            session.require_admin().await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn provider_rejection_is_a_sign_in_error() {
        let mut identity = MockIdentityProvider::new();

        identity
            .expect_sign_in()
            .once()
            .returning(|_, _| Err(IdentityError::InvalidCredentials));

        let session = session(identity);

        let result = session.sign_in("admin@cafe.test", &password("wrong")).await;

        assert!(matches!(
            result,
            Err(AppError::SignIn(IdentityError::InvalidCredentials))
        ));
    }
}

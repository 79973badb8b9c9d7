use shared::{UserProfile, UserRole};
use tracing::info;

use crate::domain::validation::required_name;
use crate::error::{ClientError, FailureContext};
use crate::query::QueryClient;

/// The signed-in caller: profile, role and admin flag
#[derive(Clone, PartialEq)]
pub struct SessionController {
    client: QueryClient,
}

impl SessionController {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    /// Outer `None` while loading, inner `None` when no profile was saved yet
    pub async fn profile(&self) -> Result<Option<Option<UserProfile>>, ClientError> {
        self.client.caller_profile().await.or_fail("Failed to load profile")
    }

    pub async fn role(&self) -> Result<Option<UserRole>, ClientError> {
        self.client.caller_role().await.or_fail("Failed to load role")
    }

    /// Asked of the gateway directly, never cached
    pub async fn is_admin(&self) -> Result<bool, ClientError> {
        self.client
            .gateway()
            .is_caller_admin()
            .await
            .or_fail("Failed to load role")
    }

    pub async fn save_profile(&self, name: &str) -> Result<&'static str, ClientError> {
        let profile = UserProfile {
            name: required_name(name)?,
        };
        self.client
            .save_caller_profile(&profile)
            .await
            .or_fail("Failed to save profile")?;
        info!("👤 Profile saved for {}", profile.name);
        Ok("Profile saved")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_profile_round_trip() {
        let gateway = Rc::new(MemoryGateway::new());
        let session = SessionController::new(QueryClient::ready(gateway.clone()));

        assert_eq!(session.profile().await, Ok(Some(None)));
        assert_eq!(session.save_profile("  Asha ").await, Ok("Profile saved"));
        assert_eq!(
            session.profile().await,
            Ok(Some(Some(UserProfile {
                name: "Asha".to_string()
            })))
        );
    }

    #[tokio::test]
    async fn test_blank_profile_name_rejected() {
        let gateway = Rc::new(MemoryGateway::new());
        let session = SessionController::new(QueryClient::ready(gateway.clone()));

        assert!(session.save_profile(" ").await.unwrap_err().is_validation());
        assert_eq!(gateway.calls("save_caller_profile"), 0);
    }

    #[tokio::test]
    async fn test_role_and_admin() {
        let gateway = Rc::new(MemoryGateway::new().with_role(UserRole::Admin));
        let session = SessionController::new(QueryClient::ready(gateway));

        assert_eq!(session.role().await, Ok(Some(UserRole::Admin)));
        assert_eq!(session.is_admin().await, Ok(true));
    }

    #[tokio::test]
    async fn test_regular_user_is_not_admin() {
        let gateway = Rc::new(MemoryGateway::new());
        let session = SessionController::new(QueryClient::ready(gateway));

        assert_eq!(session.is_admin().await, Ok(false));
    }
}

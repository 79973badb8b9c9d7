use shared::{Household, HouseholdId, HouseholdRequest};
use tracing::info;

use crate::domain::validation::required_name;
use crate::error::{ClientError, FailureContext, ValidationError};
use crate::query::QueryClient;

/// Edit buffer behind the add/edit household dialog
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HouseholdForm {
    pub name: String,
    pub address: String,
    pub contact_phone: String,
}

impl HouseholdForm {
    pub fn from_household(household: &Household) -> Self {
        Self {
            name: household.name.clone(),
            address: household.address.clone(),
            contact_phone: household.contact_phone.clone(),
        }
    }

    /// Trimmed request; the name must not be blank
    pub fn validate(&self) -> Result<HouseholdRequest, ValidationError> {
        Ok(HouseholdRequest {
            name: required_name(&self.name)?,
            address: self.address.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
        })
    }
}

#[derive(Clone, PartialEq)]
pub struct HouseholdsController {
    client: QueryClient,
}

impl HouseholdsController {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Option<Vec<Household>>, ClientError> {
        self.client.households().await.or_fail("Failed to load households")
    }

    /// Create a household, or update `editing` when set; returns the notice to show
    pub async fn save(&self, editing: Option<HouseholdId>, form: &HouseholdForm) -> Result<&'static str, ClientError> {
        let request = form.validate()?;

        match editing {
            Some(id) => {
                self.client
                    .update_household(id, &request)
                    .await
                    .or_fail("Failed to save household")?;
                info!("🏠 Household {} updated", id);
                Ok("Household updated")
            }
            None => {
                let household = self
                    .client
                    .create_household(&request)
                    .await
                    .or_fail("Failed to save household")?;
                info!("🏠 Household {} added: {}", household.id, household.name);
                Ok("Household added")
            }
        }
    }

    /// Delete a household; the gateway removes its delivery entries as well
    pub async fn delete(&self, id: HouseholdId) -> Result<&'static str, ClientError> {
        self.client
            .delete_household(id)
            .await
            .or_fail("Failed to delete household")?;
        Ok("Household deleted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use std::rc::Rc;

    fn form(name: &str, address: &str, phone: &str) -> HouseholdForm {
        HouseholdForm {
            name: name.to_string(),
            address: address.to_string(),
            contact_phone: phone.to_string(),
        }
    }

    #[test]
    fn test_form_trims_fields() {
        let request = form("  Sharma ", " 12 Park St ", " 98765 ").validate().unwrap();
        assert_eq!(request.name, "Sharma");
        assert_eq!(request.address, "12 Park St");
        assert_eq!(request.contact_phone, "98765");
    }

    #[tokio::test]
    async fn test_blank_name_rejected_without_gateway_call() {
        let gateway = Rc::new(MemoryGateway::new());
        let controller = HouseholdsController::new(QueryClient::ready(gateway.clone()));

        let err = controller.save(None, &form("   ", "x", "y")).await.unwrap_err();

        assert_eq!(err.to_string(), "Name is required");
        assert_eq!(gateway.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_add_edit_delete() {
        let gateway = Rc::new(MemoryGateway::new());
        let controller = HouseholdsController::new(QueryClient::ready(gateway.clone()));

        assert_eq!(controller.save(None, &form("Sharma", "", "")).await, Ok("Household added"));
        let households = controller.list().await.unwrap().unwrap();
        assert_eq!(households.len(), 1);
        let id = households[0].id;

        let mut edit = HouseholdForm::from_household(&households[0]);
        edit.address = "12 Park St".to_string();
        assert_eq!(controller.save(Some(id), &edit).await, Ok("Household updated"));
        let households = controller.list().await.unwrap().unwrap();
        assert_eq!(households[0].address, "12 Park St");

        assert_eq!(controller.delete(id).await, Ok("Household deleted"));
        assert_eq!(controller.list().await, Ok(Some(Vec::new())));
    }

    #[tokio::test]
    async fn test_gateway_failures_use_generic_messages() {
        let gateway = Rc::new(MemoryGateway::new());
        let controller = HouseholdsController::new(QueryClient::ready(gateway.clone()));
        gateway.fail_operation("create_household");
        gateway.fail_operation("delete_household");

        let err = controller.save(None, &form("Sharma", "", "")).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to save household");
        assert!(!err.is_validation());

        let err = controller.delete(1).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete household");
    }
}

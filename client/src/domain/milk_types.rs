use shared::{MilkType, MilkTypeId};
use tracing::info;

use crate::domain::validation::required_name;
use crate::error::{ClientError, FailureContext};
use crate::query::QueryClient;

#[derive(Clone, PartialEq)]
pub struct MilkTypesController {
    client: QueryClient,
}

impl MilkTypesController {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Option<Vec<MilkType>>, ClientError> {
        self.client.milk_types().await.or_fail("Failed to load milk types")
    }

    pub async fn create(&self, name: &str) -> Result<&'static str, ClientError> {
        let name = required_name(name)?;
        let milk_type = self
            .client
            .create_milk_type(&name)
            .await
            .or_fail("Failed to add milk type")?;
        info!("🥛 Milk type {} added: {}", milk_type.id, milk_type.name);
        Ok("Milk type added")
    }

    pub async fn rename(&self, id: MilkTypeId, name: &str) -> Result<&'static str, ClientError> {
        let name = required_name(name)?;
        self.client
            .update_milk_type(id, &name)
            .await
            .or_fail("Failed to update milk type")?;
        Ok("Milk type updated")
    }

    pub async fn delete(&self, id: MilkTypeId) -> Result<&'static str, ClientError> {
        self.client
            .delete_milk_type(id)
            .await
            .or_fail("Failed to delete milk type")?;
        Ok("Milk type deleted")
    }
}

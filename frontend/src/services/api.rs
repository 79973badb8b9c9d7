use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use milk_ledger_client::{Gateway, GatewayError, GatewayResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    DeliveryEntry, DeliveryEntryId, DeliveryEntryRequest, ErrorResponse, HolidayDate, Household,
    HouseholdId, HouseholdRequest, MarkHolidayRequest, MilkType, MilkTypeId, MilkTypeRequest,
    MonthlySummary, UserProfile, UserRole,
};

/// HTTP gateway talking JSON to the backend server
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let response = Request::get(&self.url(path)).send().await.map_err(transport)?;
        decode(check(response).await?).await
    }

    /// GET that maps a 404 to `None`
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<Option<T>> {
        let response = Request::get(&self.url(path)).send().await.map_err(transport)?;
        if response.status() == 404 {
            return Ok(None);
        }
        decode(check(response).await?).await.map(Some)
    }

    async fn send_json<B: Serialize>(builder: RequestBuilder, body: &B) -> GatewayResult<Response> {
        let response = builder
            .json(body)
            .map_err(|e| GatewayError::Transport(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(transport)?;
        check(response).await
    }

    async fn delete(&self, path: &str) -> GatewayResult<()> {
        let response = Request::delete(&self.url(path)).send().await.map_err(transport)?;
        check(response).await.map(|_| ())
    }
}

fn transport(error: gloo::net::Error) -> GatewayError {
    GatewayError::Transport(error.to_string())
}

async fn check(response: Response) -> GatewayResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(server_error(status, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Prefer the `error` field of a JSON error body, fall back to the raw text
fn server_error(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string());
    GatewayError::Server { status, message }
}

#[async_trait(?Send)]
impl Gateway for ApiClient {
    async fn ping(&self) -> GatewayResult<()> {
        let response = Request::get(&self.url("/api/health")).send().await.map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn list_households(&self) -> GatewayResult<Vec<Household>> {
        self.get("/api/households").await
    }

    async fn get_household(&self, id: HouseholdId) -> GatewayResult<Option<Household>> {
        self.get_optional(&format!("/api/households/{}", id)).await
    }

    async fn create_household(&self, request: &HouseholdRequest) -> GatewayResult<Household> {
        let response = Self::send_json(Request::post(&self.url("/api/households")), request).await?;
        decode(response).await
    }

    async fn update_household(&self, id: HouseholdId, request: &HouseholdRequest) -> GatewayResult<()> {
        let url = self.url(&format!("/api/households/{}", id));
        Self::send_json(Request::put(&url), request).await.map(|_| ())
    }

    async fn delete_household(&self, id: HouseholdId) -> GatewayResult<()> {
        self.delete(&format!("/api/households/{}", id)).await
    }

    async fn list_milk_types(&self) -> GatewayResult<Vec<MilkType>> {
        self.get("/api/milk-types").await
    }

    async fn get_milk_type(&self, id: MilkTypeId) -> GatewayResult<Option<MilkType>> {
        self.get_optional(&format!("/api/milk-types/{}", id)).await
    }

    async fn create_milk_type(&self, name: &str) -> GatewayResult<MilkType> {
        let body = MilkTypeRequest { name: name.to_string() };
        let response = Self::send_json(Request::post(&self.url("/api/milk-types")), &body).await?;
        decode(response).await
    }

    async fn update_milk_type(&self, id: MilkTypeId, name: &str) -> GatewayResult<()> {
        let body = MilkTypeRequest { name: name.to_string() };
        let url = self.url(&format!("/api/milk-types/{}", id));
        Self::send_json(Request::put(&url), &body).await.map(|_| ())
    }

    async fn delete_milk_type(&self, id: MilkTypeId) -> GatewayResult<()> {
        self.delete(&format!("/api/milk-types/{}", id)).await
    }

    async fn list_holidays(&self) -> GatewayResult<Vec<HolidayDate>> {
        self.get("/api/holidays").await
    }

    async fn mark_holiday(&self, date: &str, note: &str) -> GatewayResult<()> {
        let body = MarkHolidayRequest {
            date: date.to_string(),
            note: note.to_string(),
        };
        Self::send_json(Request::post(&self.url("/api/holidays")), &body)
            .await
            .map(|_| ())
    }

    async fn unmark_holiday(&self, date: &str) -> GatewayResult<()> {
        self.delete(&format!("/api/holidays/{}", date)).await
    }

    async fn add_delivery_entry(&self, request: &DeliveryEntryRequest) -> GatewayResult<DeliveryEntry> {
        let response = Self::send_json(Request::post(&self.url("/api/deliveries")), request).await?;
        decode(response).await
    }

    async fn update_delivery_entry(
        &self,
        id: DeliveryEntryId,
        request: &DeliveryEntryRequest,
    ) -> GatewayResult<()> {
        let url = self.url(&format!("/api/deliveries/{}", id));
        Self::send_json(Request::put(&url), request).await.map(|_| ())
    }

    async fn delete_delivery_entry(&self, id: DeliveryEntryId) -> GatewayResult<()> {
        self.delete(&format!("/api/deliveries/{}", id)).await
    }

    async fn deliveries_for_month(&self, month: &str) -> GatewayResult<Vec<DeliveryEntry>> {
        self.get(&format!("/api/deliveries?month={}", month)).await
    }

    async fn deliveries_for_household(&self, household_id: HouseholdId) -> GatewayResult<Vec<DeliveryEntry>> {
        self.get(&format!("/api/households/{}/deliveries", household_id)).await
    }

    async fn monthly_summary(&self, month: &str) -> GatewayResult<MonthlySummary> {
        self.get(&format!("/api/summary/{}", month)).await
    }

    async fn caller_profile(&self) -> GatewayResult<Option<UserProfile>> {
        self.get_optional("/api/me/profile").await
    }

    async fn save_caller_profile(&self, profile: &UserProfile) -> GatewayResult<()> {
        Self::send_json(Request::put(&self.url("/api/me/profile")), profile)
            .await
            .map(|_| ())
    }

    async fn caller_role(&self) -> GatewayResult<UserRole> {
        self.get("/api/me/role").await
    }

    async fn is_caller_admin(&self) -> GatewayResult<bool> {
        self.get("/api/me/admin").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milk_ledger_client::ClientConfig;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::with_base_url("http://ledger.local:8080/".to_string());
        assert_eq!(client.url("/api/households"), "http://ledger.local:8080/api/households");
    }

    #[test]
    fn test_default_config_base_url() {
        let client = ApiClient::with_base_url(ClientConfig::default().api_base_url);
        assert_eq!(client.url("/api/health"), "http://localhost:3000/api/health");
    }

    #[test]
    fn test_server_error_uses_error_field() {
        let err = server_error(409, r#"{"error":"Household has deliveries"}"#);
        assert_eq!(
            err,
            GatewayError::Server {
                status: 409,
                message: "Household has deliveries".to_string()
            }
        );
    }

    #[test]
    fn test_server_error_falls_back_to_body_text() {
        let err = server_error(502, "Bad Gateway\n");
        assert_eq!(
            err,
            GatewayError::Server {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }
}

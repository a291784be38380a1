use crate::client::{ApiService, ClassifiedError, Dispatcher};
use crate::transport::ApiRequest;

const LOGIN_PATH: &str = "api/account/login";

/// Payload of the user-info check. Shape is owned by the server.
pub type CheckResponse = serde_json::Value;
pub type LoginResponse = serde_json::Value;

/// Account endpoints.
#[derive(Debug, Clone)]
pub struct AccountApi {
    dispatcher: Dispatcher,
}

impl ApiService for AccountApi {
    fn bind(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl AccountApi {
    pub fn check_user_info_request(phone: &str) -> ApiRequest {
        ApiRequest::post(LOGIN_PATH).form_field("phone", phone)
    }

    pub fn login_request(phone: &str) -> ApiRequest {
        ApiRequest::post(LOGIN_PATH).form_field("phone", phone)
    }

    /// Check whether `phone` belongs to a registered user.
    pub async fn check_user_info(
        &self,
        phone: &str,
    ) -> Result<Option<CheckResponse>, ClassifiedError> {
        self.dispatcher
            .fetch(Self::check_user_info_request(phone))
            .await
    }

    pub async fn login(&self, phone: &str) -> Result<Option<LoginResponse>, ClassifiedError> {
        self.dispatcher.fetch(Self::login_request(phone)).await
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

//! Pantry backend: an account id plus a fixed basket name per checklist.
//!
//! The basket URL is `{base}/{account_id}/basket/{basket}`. Create and
//! replace are both `POST {"state": T}` to that URL; fetch is `GET`, delete
//! is `DELETE`. The account id alone authorises access.

use binder_core::Token;

use crate::error::RemoteError;
use crate::http::{encode_component, HttpClient};
use crate::store::RemoteStore;
use crate::types::{Credentials, RemoteLocator, SyncRecord};

pub const DEFAULT_BASE_URL: &str = "https://getpantry.cloud/apiv1/pantry";

#[derive(Debug, Clone)]
pub struct PantryBackend {
    base_url: String,
    basket: String,
    http: HttpClient,
}

impl PantryBackend {
    /// `basket` is the checklist's fixed basket name.
    pub fn new(base_url: impl Into<String>, basket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            basket: basket.into(),
            http: HttpClient::new(),
        }
    }

    fn basket_url(&self, locator: &RemoteLocator) -> Result<String, RemoteError> {
        match locator {
            RemoteLocator::Basket { account_id, basket } => Ok(format!(
                "{}/{}/basket/{}",
                self.base_url,
                encode_component(account_id),
                encode_component(basket)
            )),
            RemoteLocator::Uri(_) => Err(RemoteError::NotConfigured(format!(
                "pantry cannot address '{locator}'"
            ))),
        }
    }

    fn locator_for(&self, credentials: &Credentials) -> RemoteLocator {
        RemoteLocator::Basket {
            account_id: credentials.expose().to_string(),
            basket: self.basket.clone(),
        }
    }

    async fn post_state(&self, locator: &RemoteLocator, token: &Token) -> Result<u16, RemoteError> {
        let url = self.basket_url(locator)?;
        let body = SyncRecord { state: token.clone() };
        let reply = self.http.send("POST", url, Some(body)).await?;
        if reply.is_success() {
            Ok(reply.status)
        } else {
            Err(RemoteError::CreateFailed {
                status: reply.status,
            })
        }
    }
}

impl RemoteStore for PantryBackend {
    fn fixed_locator(&self, credentials: &Credentials) -> Option<RemoteLocator> {
        Some(self.locator_for(credentials))
    }

    async fn create_record(
        &self,
        credentials: &Credentials,
        token: &Token,
    ) -> Result<RemoteLocator, RemoteError> {
        let locator = self.locator_for(credentials);
        self.post_state(&locator, token).await?;
        Ok(locator)
    }

    async fn fetch_record(&self, locator: &RemoteLocator) -> Result<Token, RemoteError> {
        let url = self.basket_url(locator)?;
        let reply = self.http.send::<()>("GET", url, None).await?;
        if !reply.is_success() {
            return Err(RemoteError::FetchFailed {
                status: reply.status,
            });
        }
        Ok(reply.json::<SyncRecord>()?.state)
    }

    async fn replace_record(
        &self,
        _credentials: &Credentials,
        locator: &RemoteLocator,
        token: &Token,
    ) -> Result<(), RemoteError> {
        match self.post_state(locator, token).await {
            Ok(_) => Ok(()),
            Err(RemoteError::CreateFailed { status }) => Err(RemoteError::ReplaceFailed { status }),
            Err(other) => Err(other),
        }
    }

    async fn delete_record(
        &self,
        _credentials: &Credentials,
        locator: &RemoteLocator,
    ) -> Result<(), RemoteError> {
        let url = self.basket_url(locator)?;
        let reply = self.http.send::<()>("DELETE", url, None).await?;
        if !reply.is_success() {
            return Err(RemoteError::DeleteFailed {
                status: reply.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::serve;

    fn pantry_id() -> Credentials {
        Credentials::new("1234-abcd").expect("credentials")
    }

    #[test]
    fn locator_is_fixed_per_account_and_basket() {
        let backend = PantryBackend::new(DEFAULT_BASE_URL, "example_com_alpha");
        assert_eq!(
            backend.fixed_locator(&pantry_id()),
            Some(RemoteLocator::Basket {
                account_id: "1234-abcd".to_string(),
                basket: "example_com_alpha".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn create_and_replace_both_post_to_basket() {
        let (base, rx) = serve(vec![(200, "Your Pantry was updated"), (400, "")]);
        let backend = PantryBackend::new(format!("{base}/apiv1/pantry"), "site_alpha");

        let locator = backend
            .create_record(&pantry_id(), &Token::from("gEA"))
            .await
            .expect("create");
        let post = rx.recv().expect("post");
        assert_eq!(post.method, "POST");
        assert_eq!(post.path, "/apiv1/pantry/1234-abcd/basket/site_alpha");
        assert_eq!(post.body, r#"{"state":"gEA"}"#);

        let err = backend
            .replace_record(&pantry_id(), &locator, &Token::from("AA"))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::ReplaceFailed { status: 400 });
        assert_eq!(rx.recv().expect("second post").method, "POST");
    }

    #[tokio::test]
    async fn fetch_and_delete() {
        let (base, rx) = serve(vec![(200, r#"{"state":"_w"}"#), (404, "")]);
        let backend = PantryBackend::new(base, "b");
        let locator = backend.fixed_locator(&pantry_id()).expect("locator");

        assert_eq!(backend.fetch_record(&locator).await.expect("fetch"), Token::from("_w"));
        assert_eq!(rx.recv().expect("get").method, "GET");

        let err = backend.delete_record(&pantry_id(), &locator).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(rx.recv().expect("delete").method, "DELETE");
    }

    #[tokio::test]
    async fn uri_locator_is_rejected() {
        let backend = PantryBackend::new(DEFAULT_BASE_URL, "b");
        let err = backend
            .fetch_record(&RemoteLocator::Uri("https://elsewhere".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "not-configured");
    }
}

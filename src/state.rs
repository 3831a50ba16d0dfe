use std::sync::Arc;

use aws_config::BehaviorVersion;
use tracing::info;

use crate::config::{Config, Settings};
use crate::mailer::{Mailer, ResendMailer};
use crate::store::{DynamoStore, Store};

/// Everything a request handler needs, built once per process.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Option<Arc<dyn Mailer>>,
        settings: Settings,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            mailer,
            settings,
        })
    }

    pub async fn from_config(config: &Config) -> Arc<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(endpoint) = &config.dynamodb_endpoint {
            info!("Using DynamoDB endpoint {endpoint}");
            loader = loader.endpoint_url(endpoint);
        }
        let aws_config = loader.load().await;

        let store = DynamoStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            &config.households_table,
            &config.rsvp_table,
        );
        let mailer = config
            .resend_api_key
            .as_ref()
            .map(|key| Arc::new(ResendMailer::new(key)) as Arc<dyn Mailer>);

        Self::new(Arc::new(store), mailer, config.settings())
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn mailer(&self) -> Option<&dyn Mailer> {
        self.mailer.as_deref()
    }
}

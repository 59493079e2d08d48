//! Dashboard state shared by every resource-kind view.

use stockroom_core::{Category, Item, Warehouse};

use crate::auth::AuthClient;
use crate::config::DashboardConfig;
use crate::gateway::Gateway;
use crate::session::{Credential, Session};
use crate::view::ResourceView;

/// Collection sizes for the overview page, from whatever each cache holds.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub categories: usize,
    pub items: usize,
    pub warehouses: usize,
}

/// One session, one gateway, one view per resource kind.
#[derive(Debug)]
pub struct Dashboard {
    pub session: Session,
    pub gateway: Gateway,
    pub auth: AuthClient,
    pub categories: ResourceView<Category>,
    pub items: ResourceView<Item>,
    pub warehouses: ResourceView<Warehouse>,
}

impl Dashboard {
    /// Build the dashboard from configuration.
    ///
    /// A configured token pre-seeds the session; otherwise it starts unset.
    pub fn new(config: &DashboardConfig) -> Self {
        let session = match &config.auth_token {
            Some(token) => {
                tracing::info!("initializing dashboard with configured token");
                Session::with_credential(Credential::new(token.clone()))
            }
            None => {
                tracing::info!("initializing dashboard without a token");
                Session::new()
            }
        };
        Self::with_session(&config.api_url, session)
    }

    pub fn with_session(api_url: &str, session: Session) -> Self {
        let gateway = Gateway::new(api_url, session.clone());
        Self {
            auth: AuthClient::new(gateway.clone()),
            categories: ResourceView::new(gateway.clone()),
            items: ResourceView::new(gateway.clone()),
            warehouses: ResourceView::new(gateway.clone()),
            session,
            gateway,
        }
    }

    /// Counts of the cached collections. Kinds not loaded yet count as zero.
    pub fn summary(&self) -> Summary {
        Summary {
            categories: self.categories.cache().snapshot().len(),
            items: self.items.cache().snapshot().len(),
            warehouses: self.warehouses.cache().snapshot().len(),
        }
    }

    /// Load the item and warehouse collections, then summarize.
    pub async fn overview(&self) -> Summary {
        tokio::join!(self.items.cache().load(), self.warehouses.cache().load());
        self.summary()
    }

    /// Clear the credential and everything fetched or drafted under it.
    pub fn sign_out(&self) {
        self.auth.sign_out();
        self.categories.reset();
        self.items.reset();
        self.warehouses.reset();
    }
}

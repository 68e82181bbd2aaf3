use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::notify::Notifier;
use crate::store::Store;

/// Shared application state handed to every handler and extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub issuer: TokenIssuer,
    pub notifier: Arc<dyn Notifier>,
}

//! The API layer, containing web handlers and routing.

pub mod handlers;
pub mod router;
pub mod translate;

pub use handlers::ApiDoc;
pub use router::{RouterConfig, create_router, create_router_with_config};
pub use translate::{Fallbacks, OutcomeResponse, ResponseBody, translate, translate_preferring_payload};

pub mod catalog_service;
pub use catalog_service::CatalogService;

pub mod ingest;
pub use ingest::{FixedIntervalThrottle, IngestError, IngestReport, IngestService, WriteThrottle};

pub mod resolver;
pub use resolver::{EpisodeResolver, ResolveError, ResolvedEpisode};

pub mod token_service;
pub use token_service::{IssuedToken, TokenError, TokenService};

pub mod traits;
pub mod error;
pub mod factory;
pub mod http;
pub mod hikka;
pub mod anilist;

pub use traits::{HistorySource, ListTracker};
pub use error::{GraphQlError, SourceError};
pub use factory::{create_sources, Sources};
pub use hikka::HikkaClient;
pub use anilist::AniListClient;

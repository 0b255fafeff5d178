pub mod account;
pub mod assistant;
pub mod catalog;
pub mod episodes;
pub mod guard;
pub mod report;
pub mod session;
pub mod stats;
pub mod validation;
pub mod watchlist;

#[cfg(test)]
mod test_support;

pub use account::AccountError;
pub use assistant::{Conversation, AssistantError};
pub use episodes::{EpisodeTracker, LoadState};
pub use guard::{Access, Route};
pub use session::Session;
pub use stats::{derive_stats, format_watch_time, StatsProvider};
pub use validation::ValidationErrors;
pub use watchlist::{StatsRefreshHandle, WatchlistError, WatchlistState, WatchlistView};

pub mod animation;
pub mod app;
pub mod audio;
pub mod boundary;
pub mod config;
pub mod header;
pub mod logging;
pub mod lookup;
pub mod results;
pub mod search;
pub mod ui;

pub use app::{App, AppChannels, View};
pub use config::Config;
pub use lookup::{FetchStatus, LookupPipeline, LookupSource, Shown};
pub use search::{SearchInput, SearchState, SearchTerm};

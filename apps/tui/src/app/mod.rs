// Application controller: state, background tasks and input handling

pub mod actions;
mod controller;
pub mod input;
pub mod search;
pub mod state;

pub use actions::AppEvent;
pub use input::{handle_input, handle_mouse};
pub use search::{ParsedInput, SearchMachine, SearchRequest, SearchState};
pub use state::{App, Banner, BannerKind, Focus, HoverInfo, Overlay, RelatedTab};

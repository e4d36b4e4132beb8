pub mod crawler;
pub mod frontier;
pub mod session;
pub mod web;


pub use crawler::{Browser, LoadedPage};
pub use frontier::{Frontier, FrontierItem};
pub use session::WebDriverBrowser;
pub use web::{CrawlState, Orchestrator};

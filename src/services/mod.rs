pub mod config;
pub mod correction;
pub mod encoding;
pub mod index;
pub mod locator;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod verify;

pub mod catalog;
pub mod config;
pub mod ledger;
pub mod lookup;
pub mod platform;
pub mod playback;
pub mod storage;

pub mod fanout;
pub mod languages;
pub mod panel;
pub mod prefs;
pub mod presence;
pub mod reply;
pub mod store;
pub mod sync;

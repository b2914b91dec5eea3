pub mod dependencies;
pub mod events;
pub mod filename;
pub mod http_client;
pub mod process;
pub mod queue;
pub mod search;
pub mod select;
pub mod ytdlp;

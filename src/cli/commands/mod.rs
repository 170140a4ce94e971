mod ingest;
mod list;
mod token;

pub use ingest::cmd_ingest;
pub use list::cmd_list_anime;
pub use token::{cmd_resolve, cmd_token};

mod preview;
mod root;
mod schema;

pub use preview::PreviewCommand;
pub use root::Cli;
pub use schema::SchemaCommand;

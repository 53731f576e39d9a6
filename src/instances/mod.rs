pub mod editor;
pub mod filter;
pub mod page;

pub use editor::InstanceEditor;
pub use filter::{FetchScope, FilterOutcome, FilterState};
pub use page::InstancesPage;

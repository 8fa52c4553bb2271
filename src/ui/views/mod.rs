//! Application views (panes).

mod detail;
mod list;

pub use detail::DetailView;
pub use list::ListView;

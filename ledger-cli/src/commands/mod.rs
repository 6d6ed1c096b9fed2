//! CLI command implementations

pub mod list;
pub mod restore;
pub mod scan;
pub mod scan_all;
pub mod select;

pub use list::ListArgs;
pub use restore::RestoreArgs;
pub use scan::ScanArgs;
pub use scan_all::ScanAllArgs;
pub use select::SelectArgs;

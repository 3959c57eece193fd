pub mod export;
pub mod filters;
pub mod format;
pub mod pagination;
pub mod sql;

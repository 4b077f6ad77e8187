pub mod auditor;
pub mod fallback;

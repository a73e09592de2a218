pub mod checklist;
pub mod new;
pub mod page;
pub mod remote;

//! Runtime plumbing shared by the animator and its observers.

pub mod event;

//! View-model logic for the four sections: drafts, filters, counts and
//! layouts. Nothing in here talks to a backend.

pub mod dashboard;
pub mod diary;
pub mod inspiration;
pub mod layout;
pub mod tasks;

//! Crossword Coach game client.
//!
//! The pieces, bottom-up: [`storage`] and [`progress`] remember where the
//! player stopped for each filter; [`session`] holds the page cache and the
//! displayed entry; [`coach`] runs the fetches a session asks for against an
//! [`api::CoachApi`].

pub mod api;
pub mod coach;
pub mod config;
pub mod error;
pub mod explanation;
pub mod progress;
pub mod score;
pub mod session;
pub mod storage;

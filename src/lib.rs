//! Client for an Indonesian sentiment-analysis backend.
//!
//! [`controller::Controller`] owns one page document and runs every user
//! action against the backend through an [`api::Transport`]. The CLI and the
//! embedded web page are two front-ends over the same controller.

pub mod actions;
pub mod api;
pub mod auth;
pub mod charts;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dom;
pub mod events;
pub mod export;
pub mod models;
pub mod render;
pub mod state;
pub mod storage;
pub mod style;
pub mod view;
pub mod web;

//! HTTP route handlers

pub mod account;

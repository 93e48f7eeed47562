pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod dto;
pub mod otp;
pub mod state;
pub mod validation;

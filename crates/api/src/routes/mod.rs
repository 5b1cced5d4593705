//! Route Handlers

pub mod alerts;

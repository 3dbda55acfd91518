//! llum-engine: energy economics for Spanish household electricity bills.
//!
//! The engine has five cores: invoice field extraction from OCR text
//! ([`invoice`]), reference-price resolution with live/cache/fallback
//! layering ([`pricing`]), bill simulation with regulated tax stacking
//! ([`billing`]), tariff comparison (also [`billing`]), and rooftop solar
//! ROI estimation ([`solar`]). Everything is exposed both as a library
//! and over a small JSON API ([`api`]).

pub mod api;
pub mod billing;
pub mod config;
pub mod domain;
pub mod forecast;
pub mod insights;
pub mod invoice;
pub mod pricing;
pub mod solar;
pub mod telemetry;

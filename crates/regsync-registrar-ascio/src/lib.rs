// # ASCIO Registrar
//
// This crate provides the ASCIO implementations of the regsync collaborator
// traits:
//
// - `AscioClient`: `RegistrarClient` over the ASCIO v3 SOAP API
// - `TldKitCatalog`: `TldCatalog` over the TLDKit REST API
//
// ## Constraints
//
// Clients are stateless and single-shot:
//
// - One HTTP request per trait call
// - NO retry logic (a failed call ends the run, the engine reports it)
// - NO caching (policy caching is owned by `TldPolicySource`)
// - NO background tasks
//
// ## Security Requirements
//
// - Credentials arrive per call and are never stored by the clients
// - Credentials NEVER appear in logs: the request log sees the SOAP body,
//   the security header is added afterwards
//
// ## Example
//
// ```rust,ignore
// use std::sync::Arc;
// use regsync_core::traits::TracingRequestLog;
// use regsync_registrar_ascio::{AscioClient, TldKitCatalog, ASCIO_ENDPOINT};
//
// let registrar = AscioClient::new(ASCIO_ENDPOINT, Arc::new(TracingRequestLog::enabled()))?;
// let catalog = TldKitCatalog::production()?;
// ```

pub mod client;
pub mod response;
pub mod soap;
pub mod tldkit;
pub mod xml;

pub use client::{ASCIO_ENDPOINT, AscioClient};
pub use tldkit::{TLDKIT_BASE_URL, TldKitCatalog};

// # regsync-core
//
// Core library for declarative domain registration management.
//
// ## Architecture Overview
//
// - **RegistrarClient**: Trait for querying and ordering at the registrar
// - **TldCatalog**: Trait for looking up per-TLD registry policy
// - **PolicyCache**: Trait for keeping catalog entries between runs
// - **TldPolicySource**: Cached policy answers for the engine's gates
// - **Reconciler**: Core engine that converges a domain towards its desired state
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Engine logic is separate from the wire clients
// 2. **Check before act**: Every run fetches and diffs before it may order
// 3. **Fail closed**: A policy that cannot be read blocks the order
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Idempotency**: A converged domain produces no orders

pub mod availability;
pub mod cache;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod report;
pub mod traits;

// Re-export core types for convenience
pub use traits::{PolicyCache, RegistrarClient, RequestLog, TldCatalog};
pub use engine::{Reconciler, ReconciliationResult};
pub use config::{Credentials, DesiredConfig, PolicyCacheConfig, PolicyFlags, RunMode};
pub use error::{Error, Result};
pub use cache::{FilePolicyCache, MemoryPolicyCache};
pub use model::{Contact, ContactRole, CurrentState, NameServers};
pub use policy::{PolicyGateResult, TldPolicySource};

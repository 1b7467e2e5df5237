//! Profile and user persistence
//!
//! Handlers talk to storage through two traits:
//! - [`UserStore`] looks up accounts owned by the surrounding application
//! - [`ProfileStore`] reads and writes profile records
//!
//! Two backends ship with the crate: [`MemoryStore`] for tests and demos and
//! [`PgStore`] for PostgreSQL.

mod memory;
mod postgres;
mod traits;
mod types;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use traits::{ProfileStore, UserStore};
pub use types::{ProfileDraft, ProfileRecord, RelationValues, User};

// Entity Models
//
// Each entity has a stable identity that never changes (the AMFI id for AMCs)
// plus a registry for exact lookups.

pub mod amc;

pub use amc::{Amc, AmcError, AmcRegistry};

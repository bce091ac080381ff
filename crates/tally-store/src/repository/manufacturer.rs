//! # Manufacturer Repository
//!
//! `Unknown Manufacturer` is the fallback for products whose manufacturer
//! was deleted.

use super::reference::{Manufacturers, ReferenceRepository};

/// Repository for manufacturers.
pub type ManufacturerRepository = ReferenceRepository<Manufacturers>;

//! Rules engine for a tile-placement territory game: a growing grid of
//! square tiles, legal-placement enumeration, token claims on roads, towns
//! and fields, and closure detection + scoring of connected structures.

pub mod game;
pub mod rules;

pub mod d1_database;

pub use d1_database::D1Service;

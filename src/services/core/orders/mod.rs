pub mod overlay;

pub use overlay::{OrderOverlayService, OrderStore, SyntheticOrderStore};

pub mod engagement;
pub mod graph;
pub mod photos;
pub mod traits;
pub mod users;

pub use engagement::EngagementRepository;
pub use graph::GraphRepository;
pub use photos::PhotoRepository;
pub use traits::{EngagementStore, GraphStore, PhotoStore, UserStore};
pub use users::UserRepository;

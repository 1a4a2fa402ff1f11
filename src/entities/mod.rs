pub mod post;
pub mod roadmap_assignment;
pub mod roadmap_column;

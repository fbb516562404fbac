pub mod community;
pub mod graph;
pub mod knowledge_areas;
pub mod members;
pub mod network;
pub mod ownership;
pub mod sentiment;
pub mod silo;

/// Particle spawning, random walks and sticking
pub mod aggregation;
/// Blurred secondary field blended with the sharp ridges
pub mod compositor;
/// Seeded and scripted random draw sources
pub mod random;
/// Pass-by-pass refinement of grid and graph
pub mod refinement;
/// Forest of particle attachments
pub mod stick_graph;
/// Pluggable weight assignment over the stick graph
pub mod weights;

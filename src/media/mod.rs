//! Media generation: images, videos and diagrams

pub mod diagrams;
pub mod images;
pub mod videos;

pub use diagrams::{parse_diagram, Diagram, DiagramService};
pub use images::ImageService;
pub use videos::VideoService;

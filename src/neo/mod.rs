pub mod visualization;

pub use visualization::process_for_visualization;

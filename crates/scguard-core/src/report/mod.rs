pub mod model;
pub mod render;

pub use model::{AnalysisInfo, InputHash, InputInfo, Report, ToolInfo};
pub use render::render_text;

pub mod analysis;
pub mod auth;
pub mod chart;
pub mod history;
pub mod screener;
pub mod series;

pub use analysis::*;
pub use auth::*;
pub use chart::*;
pub use history::*;
pub use screener::*;
pub use series::*;

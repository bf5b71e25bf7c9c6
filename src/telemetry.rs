mod history;
mod reading;

pub use history::*;
pub use reading::*;

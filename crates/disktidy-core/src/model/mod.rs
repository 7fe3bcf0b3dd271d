/// Data model shared by the survey and remediation halves of the engine.
pub mod node;
pub mod outcome;
pub mod size;
pub mod target;

pub use node::{Node, Preorder, LARGE_FILE_THRESHOLD};
pub use outcome::{Outcome, Summary};
pub use target::{Category, ParseCategoryError, Target};

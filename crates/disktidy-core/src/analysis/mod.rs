/// Analysis modules: read-only queries over a finished survey tree.
///
/// None of these touch the filesystem; they only walk the [`Node`] tree
/// that a survey already built.
///
/// [`Node`]: crate::model::Node
pub mod age;
pub mod duplicates;
pub mod leaves;
pub mod top_files;

pub use age::{find_stale_files, StaleFile};
pub use duplicates::{duplicate_candidates, group_by_size, SizeCandidateGroup};
pub use leaves::collect_leaves;
pub use top_files::top_n_by_size;

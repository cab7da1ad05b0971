/*!
 * Flashcard derivation from subtitle entries.
 *
 * Everything in this module is a pure function of the loaded entries and
 * the run configuration:
 *
 * - `context`: neighbouring lines by logical index
 * - `timing`: padded extraction windows
 * - `naming`: deterministic media file names
 * - `row`: tab-separated card rows
 * - `plan`: per-entry combination of the above plus the media commands
 */

// Re-export main types for easier usage
pub use self::context::{ContextLines, ContextResolver};
pub use self::naming::{MediaNames, NamingScheme, UniqueNames};
pub use self::plan::{CardPlan, DeckPlanner};
pub use self::row::CardRow;
pub use self::timing::PaddedWindow;

// Submodules
pub mod context;
pub mod naming;
pub mod plan;
pub mod row;
pub mod timing;

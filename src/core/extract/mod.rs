//! Translation reference extraction.
//!
//! - `call`: parser collaborator interface (`CallEnumerator`, `CallArgument`)
//! - `swc_enumerator`: swc-backed `CallEnumerator`
//! - `extractor`: cached, parallel reference extraction

pub mod call;
pub mod extractor;
pub mod swc_enumerator;

pub use call::{CallArgument, CallEnumerator, ParsedCall, callee_matches};
pub use extractor::{ExtractionOutput, ExtractionResult, ReferenceExtractor};
pub use swc_enumerator::SwcCallEnumerator;

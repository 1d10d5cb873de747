//! Rewrites animated JSX components into their plain markup equivalents.
//!
//! ```
//! use deanimate::{Options, Pipeline};
//!
//! let pipeline = Pipeline::new(&Options::default()).unwrap();
//! let result = pipeline.transform("<AnimatedParagraph delay={100}>Hi</AnimatedParagraph>");
//! assert_eq!(result.text, "<p>Hi</p>");
//! assert!(result.changed);
//! ```

pub mod attrs;
pub mod driver;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scan;
pub mod select;

pub use driver::{Driver, FileError, FileOutcome, FileReport, RunSummary, WriteFn};
pub use pipeline::{Options, Pipeline, PipelineError, TransformResult, DEFAULT_MODULE};
pub use rules::HeadingClose;
pub use select::{Discovery, Selection};

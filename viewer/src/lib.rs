//! Replay core of the warroom debugging visualizer.
//!
//! A session loads a recorded event log and an ASCII board template once,
//! builds the spatial model (template grid, territory anchors, flood-filled
//! territory areas), then steps through the log under manual or automatic
//! pacing. BOARD events become paintable character frames, TREE events become
//! layout-ready graph descriptions with change highlights. Drawing and graph
//! layout are external collaborators; nothing here touches a surface.

pub mod area;
pub mod board;
pub mod layout;
pub mod replay;
pub mod session;
pub mod sources;
pub mod template;
pub mod tree;

pub use board::{BoardFrame, BoardRenderer, FrameCell};
pub use replay::{NavParams, Rendered, Replayer, StepOutcome};
pub use session::{BoardFile, Session, StartupError};
pub use template::{MapTemplate, ParseError};
pub use tree::{TreeDiffTracker, TreeFrame};

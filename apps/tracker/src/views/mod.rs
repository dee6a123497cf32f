// Views own their state snapshots and talk to the gateway and presenter seams.
// Rendering is a pure function of a snapshot into a `ViewNode` tree.

pub mod poll;
pub mod recruiter;
pub mod render;
pub mod seeker;
pub mod tree;

pub use poll::PollHandle;
pub use recruiter::{RecruiterView, StatusChange};
pub use render::render_text;
pub use seeker::{SeekerView, SubmitResult};
pub use tree::ViewNode;

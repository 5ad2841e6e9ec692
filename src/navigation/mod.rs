//! Live navigation: sensor fusion, arrival detection, and the phase
//! state machine for one in-progress trip.

pub mod arrival;
pub mod fusion;
pub mod machine;
pub mod mode;
pub mod service;
pub mod session;

pub use arrival::ArrivalDetector;
pub use fusion::PositionFusion;
pub use machine::{NavigationError, Navigator, Transition};
pub use mode::WalkingMode;
pub use service::NavigationService;
pub use session::{NavigationSession, Phase, SessionSnapshot};

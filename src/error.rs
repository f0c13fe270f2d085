use thiserror::Error;
use uuid::Uuid;

/// Every failure mode the layout engine can produce. All are fatal for the
/// current call; none are retried internally.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("nodes {a} and {b} share an original x coordinate; slope is undefined")]
    VerticalEdge { a: Uuid, b: Uuid },

    #[error("node {0} would exceed the maximum degree (2 predecessors, 2 successors, 3 incident edges)")]
    DegreeExceeded(Uuid),

    #[error("node {0} would belong to two distinct main tracks")]
    MainTrackCollision(Uuid),

    #[error("edge {0} is fully diagonal but carries more than one signal on a side")]
    DiagonalSignalOverflow(Uuid),

    #[error("breakpoint on edge {0} matches neither endpoint's y coordinate")]
    MalformedBreakpoint(Uuid),

    #[error("computed signal position {0} for edge {1} falls outside [0, 1]")]
    BadRelativePosition(f64, Uuid),

    #[error("no edge found between nodes {0} and {1}")]
    EdgeNotFound(Uuid, Uuid),

    #[error("signal {0} is not attached to edge {1}")]
    SignalNotOnEdge(Uuid, Uuid),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

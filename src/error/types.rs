use thiserror::Error;

/// Unified result type for the floor-plan crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal failures while building or validating a floor plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("plan dimensions {width}x{height} have zero area")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("room `{label}` has a non-positive or non-finite size")]
    InvalidRoomSize { label: String },
    #[error("room label must not be empty")]
    EmptyLabel,
    #[error("room label `{0}` is used more than once")]
    DuplicateLabel(String),
    #[error("room `{label}` cannot be placed within the plan bounds")]
    LayoutOverflow { label: String },
    #[error("anchored room `{label}` overlaps anchored room `{other}`")]
    AnchorOverlap { label: String, other: String },
    #[error("room `{label}` extends outside the plan bounds")]
    RoomOutOfBounds { label: String },
    #[error("rooms `{first}` and `{second}` overlap")]
    RoomOverlap { first: String, second: String },
    #[error("door `{from}` -> `{to}` references an unknown room")]
    DanglingReference { from: String, to: String },
    #[error("door connects room `{label}` to itself")]
    SelfAdjacency { label: String },
    #[error("door `{from}` -> `{to}` is not on their shared boundary")]
    DoorOffBoundary { from: String, to: String },
}

/// Recovered conditions reported alongside a successfully built plan.
/// The door in question is omitted from the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutWarning {
    #[error("rooms `{from}` and `{to}` share no wall; door omitted")]
    NoSharedBoundary { from: String, to: String },
    #[error("room `{from}` lists unknown neighbour `{to}`; door omitted")]
    DanglingReference { from: String, to: String },
    #[error("room `{label}` lists itself as a neighbour; door omitted")]
    SelfAdjacency { label: String },
}

/// Render preconditions. A failed render issues no draw operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("surface {width}x{height} is not drawable")]
    InvalidSurface { width: f64, height: f64 },
    #[error("plan has zero area")]
    EmptyPlan,
    #[error("cell scale {0} must be finite and positive")]
    InvalidScale(f64),
    #[error("plan {width}x{height} needs more than {limit} grid lines")]
    GridTooLarge { width: u32, height: u32, limit: u64 },
}

/// Failures loading options or requests from disk or JSON.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the floor-plan engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("prompt could not be resolved: {0}")]
    Resolve(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(ConfigError::Json(err))
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("canvas is empty")]
    EmptyCanvas,
    #[error("region has no foreground pixels")]
    EmptyRegion,
    #[error("contour did not close after {0} steps")]
    ContourNotClosed(usize),
    #[error("mirror line x={x} is outside a canvas of width {width}")]
    MirrorOutOfCanvas { x: i32, width: usize },
    #[error("body half width {shift} around x={x} leaves a canvas of width {width}")]
    BoundaryOutOfCanvas { x: i32, shift: u32, width: usize },
    #[error("no shift has been confirmed")]
    ShiftNotConfirmed,
    #[error("no track has been drawn")]
    NoTracks,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("threshold {0} is outside [{min}, {max}]", min = crate::Threshold::MIN, max = crate::Threshold::MAX)]
pub struct ThresholdError(pub i32);

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record names {record:?} but the session holds {session:?}")]
    NameMismatch { record: String, session: String },
    #[error("{side:?} track point {point} lies outside its wing band")]
    TrackOutOfBand { side: crate::Side, point: glam::IVec2 },
    #[error(transparent)]
    Geometry(#[from] Error),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

//! What a caller submits: the input, the operation and the target identity.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use super::slot::SlotHandle;
use crate::config::PrepConfig;
use crate::decode::{
    load_oriented, load_profile_picture, DecodeError, ImageSource, RasterImage, RotationAngle,
};
use crate::filter::stack_blur;
use crate::transform::crop_to_square;

/// Failure of a single transform request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Blur radius outside `1..=MAX_BLUR_RADIUS`.
    #[error("Invalid blur radius: {0}")]
    InvalidRadius(u32),

    /// Decoding the request input failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The worker panicked while running the request.
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Identifier assigned to each submitted request. Later submissions get
/// larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub(crate) u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of the content a destination is expected to show, such as a
/// display slot's image URL or a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetToken(String);

impl TargetToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for TargetToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for TargetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the content loader got the image from. Passed through to the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ContentSource {
    Network,
    DiskCache,
    MemoryCache,
    #[default]
    Local,
}

/// Pixel operation run on a worker after the input is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Operation {
    Identity,
    Blur { radius: u32 },
    SquareCrop { rotation: RotationAngle },
}

impl Operation {
    /// Blur with the configured radius.
    pub fn blur_with(config: &PrepConfig) -> Self {
        Operation::Blur {
            radius: config.blur_radius,
        }
    }

    /// Run the operation.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::InvalidRadius` for a blur radius outside
    /// `1..=MAX_BLUR_RADIUS`.
    pub fn apply(&self, image: RasterImage) -> Result<RasterImage, TransformError> {
        match *self {
            Operation::Identity => Ok(image),
            Operation::Blur { radius } => {
                stack_blur(&image, radius).ok_or(TransformError::InvalidRadius(radius))
            }
            Operation::SquareCrop { rotation } => Ok(crop_to_square(image, rotation)),
        }
    }
}

/// How a source is decoded when the request carries encoded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DecodePlan {
    /// Bounded decode that fits the request, optionally rotated upright.
    Oriented {
        req_width: u32,
        req_height: u32,
        apply_rotation: bool,
    },
    /// Upright square profile picture no larger than `max_side`.
    Profile { max_side: u32 },
}

impl DecodePlan {
    /// Oriented decode at the configured default size.
    pub fn oriented(config: &PrepConfig) -> Self {
        DecodePlan::Oriented {
            req_width: config.max_width,
            req_height: config.max_height,
            apply_rotation: true,
        }
    }

    /// Profile picture at the configured side.
    pub fn profile(config: &PrepConfig) -> Self {
        DecodePlan::Profile {
            max_side: config.profile_side,
        }
    }

    fn load(self, source: &dyn ImageSource) -> Result<RasterImage, DecodeError> {
        match self {
            DecodePlan::Oriented {
                req_width,
                req_height,
                apply_rotation,
            } => load_oriented(source, req_width, req_height, apply_rotation),
            DecodePlan::Profile { max_side } => load_profile_picture(source, max_side),
        }
    }
}

/// Image a request starts from.
pub enum TransformInput {
    /// Already decoded.
    Image(RasterImage),
    /// Decoded on the worker according to `plan`.
    Decode {
        source: Box<dyn ImageSource + Send>,
        plan: DecodePlan,
    },
}

impl TransformInput {
    pub fn decode(source: impl ImageSource + Send + 'static, plan: DecodePlan) -> Self {
        TransformInput::Decode {
            source: Box::new(source),
            plan,
        }
    }

    pub(crate) fn resolve(self) -> Result<RasterImage, TransformError> {
        match self {
            TransformInput::Image(image) => Ok(image),
            TransformInput::Decode { source, plan } => Ok(plan.load(source.as_ref())?),
        }
    }
}

impl fmt::Debug for TransformInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformInput::Image(image) => f
                .debug_tuple("Image")
                .field(&format_args!("{}x{}", image.width(), image.height()))
                .finish(),
            TransformInput::Decode { source, plan } => f
                .debug_struct("Decode")
                .field("source", &source.describe())
                .field("plan", plan)
                .finish(),
        }
    }
}

impl From<RasterImage> for TransformInput {
    fn from(image: RasterImage) -> Self {
        TransformInput::Image(image)
    }
}

/// One unit of work for the pipeline.
pub struct TransformRequest<B> {
    pub input: TransformInput,
    pub operation: Operation,
    /// Content the slot must still show for the result to be bound.
    pub token: TargetToken,
    pub source: ContentSource,
    pub slot: SlotHandle<B>,
}

impl<B> TransformRequest<B> {
    pub fn new(
        input: impl Into<TransformInput>,
        operation: Operation,
        token: impl Into<TargetToken>,
        slot: &SlotHandle<B>,
    ) -> Self {
        Self {
            input: input.into(),
            operation,
            token: token.into(),
            source: ContentSource::default(),
            slot: Rc::clone(slot),
        }
    }

    pub fn with_source(mut self, source: ContentSource) -> Self {
        self.source = source;
        self
    }
}

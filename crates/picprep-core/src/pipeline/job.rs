//! Work executed on a background worker.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::request::{Operation, RequestId, TransformError, TransformInput};
use crate::decode::RasterImage;

/// The `Send` part of a request: everything except the destination.
#[derive(Debug)]
pub(crate) struct Job {
    pub(crate) id: RequestId,
    pub(crate) input: TransformInput,
    pub(crate) operation: Operation,
}

/// Outcome sent back to the owning thread.
#[derive(Debug)]
pub(crate) struct Completion {
    pub(crate) id: RequestId,
    pub(crate) outcome: Result<RasterImage, TransformError>,
}

impl Job {
    /// Decode (if needed) and apply the operation. Never panics: a panic in
    /// either step becomes `TransformError::WorkerPanicked`.
    pub(crate) fn run(self) -> Completion {
        let Job {
            id,
            input,
            operation,
        } = self;

        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let image = input.resolve()?;
            operation.apply(image)
        }))
        .unwrap_or_else(|payload| Err(TransformError::WorkerPanicked(panic_message(&*payload))));

        Completion { id, outcome }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodeBounds, DecodeError, ImageSource, Orientation, SampleSize};

    struct Exploding;

    impl ImageSource for Exploding {
        fn describe(&self) -> String {
            "exploding".to_string()
        }

        fn probe(&self) -> Result<DecodeBounds, DecodeError> {
            panic!("probe exploded");
        }

        fn decode(&self, _sample_size: SampleSize) -> Result<RasterImage, DecodeError> {
            unreachable!()
        }

        fn read_orientation(&self) -> Result<Orientation, DecodeError> {
            Ok(Orientation::Normal)
        }
    }

    #[test]
    fn test_run_applies_operation() {
        let job = Job {
            id: RequestId(3),
            input: TransformInput::Image(RasterImage::filled(4, 4, 0xFF11_2233).unwrap()),
            operation: Operation::Blur { radius: 2 },
        };
        let completion = job.run();
        assert_eq!(completion.id, RequestId(3));
        assert_eq!(
            completion.outcome.unwrap(),
            RasterImage::filled(4, 4, 0xFF11_2233).unwrap()
        );
    }

    #[test]
    fn test_run_reports_operation_error() {
        let job = Job {
            id: RequestId(0),
            input: TransformInput::Image(RasterImage::filled(1, 1, 0).unwrap()),
            operation: Operation::Blur { radius: 0 },
        };
        assert_eq!(job.run().outcome, Err(TransformError::InvalidRadius(0)));
    }

    #[test]
    fn test_run_catches_panic() {
        let job = Job {
            id: RequestId(1),
            input: TransformInput::decode(
                Exploding,
                crate::pipeline::DecodePlan::Profile { max_side: 10 },
            ),
            operation: Operation::Identity,
        };
        match job.run().outcome {
            Err(TransformError::WorkerPanicked(message)) => {
                assert_eq!(message, "probe exploded")
            }
            other => panic!("expected a caught panic, got {other:?}"),
        }
    }

    #[test]
    fn test_panic_message_formats() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*owned), "owned");
        let other: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&*other), "unknown panic payload");
    }
}

//! Progress observability: an explicit event stream produced by the digesters and
//! consumed by an independent reporter.

pub mod bus;
pub mod event;
pub mod reporter;

pub use bus::{NullSink, ProgressBus, ProgressSink};
pub use event::{DigestEvent, Phase, ProgressEnvelope};
pub use reporter::{ReportStyle, Reporter};

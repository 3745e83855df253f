pub mod dispatcher;
pub mod metrics;
pub mod numeric;
pub mod providers;

pub use dispatcher::{DispatchError, Dispatcher};
pub use self::metrics::{get_metrics, init_metrics, record_operation};

//! Reactive runtime pieces the binding compiler executes against: signals
//! with stoppable effects, the view-model with its binding ledger, and
//! component lifecycle hooks.

pub mod ledger;
pub mod lifecycle;
pub mod signal;
pub mod view_model;

pub use ledger::{BindingId, BindingLedger, LiveBinding, OwnedBinding};
pub use lifecycle::Lifecycle;
pub use signal::{Effect, Signal, effect};
pub use view_model::{ViewModel, display_value};

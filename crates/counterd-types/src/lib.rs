//! Entity model and value vocabulary for counting peripherals.
//!
//! This crate provides the driver-facing description of a counting device
//! and the textual value conventions shared with the namespace core:
//!
//! - [`Device`]: one counting peripheral with its accessor table
//! - [`Signal`]: a physical input line the device observes
//! - [`Count`]: an accumulator/decoder unit combining Signals
//! - [`Synapse`]: the Count-to-Signal association plus its edge policy
//! - [`FunctionKind`] / [`ActionKind`]: the mode vocabularies
//! - [`CountValue`] / [`CountWriteValue`]: textual count value adapters
//! - [`CounterError`]: the error taxonomy used across the system
//!
//! A driver builds the entity graph up front, hands it to the registration
//! layer in `counterd-core`, and from then on the graph is structurally
//! frozen: only the two "last observed mode" caches ([`Count`] function
//! index, [`Synapse`] action index) change, and only right after a
//! successful hardware round-trip.

mod count;
mod device;
mod error;
mod modes;
mod signal;
mod values;

pub use count::{Count, CountExt, CountExtReadFn, CountExtWriteFn, Synapse};
pub use device::{
    ActionGetFn, ActionSetFn, CountReadFn, CountWriteFn, Device, DeviceExt, DeviceExtReadFn,
    DeviceExtWriteFn, DeviceOps, FunctionGetFn, FunctionSetFn, SignalReadFn,
};
pub use error::{CounterError, CounterResult};
pub use modes::{ActionKind, FunctionKind, ParseActionKindError, ParseFunctionKindError};
pub use signal::{Signal, SignalExt, SignalExtReadFn, SignalExtWriteFn};
pub use values::{CountValue, CountWriteValue, SignalLevel};

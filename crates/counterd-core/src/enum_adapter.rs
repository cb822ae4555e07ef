//! Generic enum attribute adapter.
//!
//! Enum style attributes map a fixed ordered table of option strings to
//! unsigned indices understood by a driver. One generic implementation
//! covers the Signal-level, Count-level, and device-level flavors; only
//! the context type the callbacks close over differs. The same matching
//! and listing primitives back the built-in `function` and `action`
//! endpoints.

use counterd_types::{
    Count, CountExt, CounterError, CounterResult, Device, DeviceExt, Signal, SignalExt,
};
use std::fmt;
use std::sync::Arc;

/// Get callback: returns the index of the currently active item.
pub type EnumGetFn<C> = Arc<dyn Fn(&C) -> CounterResult<usize> + Send + Sync>;

/// Set callback: activates the item at the given index.
pub type EnumSetFn<C> = Arc<dyn Fn(&C, usize) -> CounterResult<()> + Send + Sync>;

/// An enum style extension attribute: an ordered string table plus
/// optional get/set callbacks.
///
/// `C` is the entity the attribute is attached to ([`Signal`], [`Count`],
/// or [`Device`]).
pub struct EnumExt<C> {
    items: Vec<String>,
    get: Option<EnumGetFn<C>>,
    set: Option<EnumSetFn<C>>,
}

impl<C> Clone for EnumExt<C> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<C> EnumExt<C> {
    /// Creates an adapter over the given item table with no callbacks.
    pub fn new(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            get: None,
            set: None,
        }
    }

    /// Sets the get callback.
    pub fn with_get(mut self, get: impl Fn(&C) -> CounterResult<usize> + Send + Sync + 'static) -> Self {
        self.get = Some(Arc::new(get));
        self
    }

    /// Sets the set callback.
    pub fn with_set(
        mut self,
        set: impl Fn(&C, usize) -> CounterResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.set = Some(Arc::new(set));
        self
    }

    /// Returns the item table.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Reads the currently active item, newline-terminated.
    ///
    /// Fails with `Unsupported` if there is no get callback and with
    /// `Internal` if the driver returns an index outside the table.
    pub fn read(&self, ctx: &C) -> CounterResult<String> {
        let get = self.get.as_ref().ok_or(CounterError::Unsupported)?;
        let index = get(ctx)?;
        let item = self.items.get(index).ok_or_else(|| {
            CounterError::internal(format!(
                "enum index {index} out of range ({} items)",
                self.items.len()
            ))
        })?;
        Ok(format!("{item}\n"))
    }

    /// Activates the item named by `buf` and reports the consumed length.
    ///
    /// Matching is exact after trailing whitespace is stripped. Fails with
    /// `Unsupported` if there is no set callback and with `NotFound` if
    /// the string is not in the table; the set callback is not called in
    /// either case.
    pub fn write(&self, ctx: &C, buf: &str) -> CounterResult<usize> {
        let set = self.set.as_ref().ok_or(CounterError::Unsupported)?;
        let index =
            match_item(&self.items, buf).ok_or_else(|| CounterError::not_found(buf.trim_end()))?;
        set(ctx, index)?;
        Ok(buf.len())
    }

    /// Lists every item in table order, one per line. Never fails; an
    /// empty table yields empty output.
    pub fn available(&self) -> String {
        list_items(&self.items)
    }
}

impl<C> fmt::Debug for EnumExt<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumExt")
            .field("items", &self.items)
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .finish()
    }
}

/// Finds `buf` in `items`, ignoring trailing whitespace on the input.
pub(crate) fn match_item<S: AsRef<str>>(items: &[S], buf: &str) -> Option<usize> {
    let wanted = buf.trim_end();
    items.iter().position(|item| item.as_ref() == wanted)
}

/// Renders `items` as a newline-terminated list in table order.
pub(crate) fn list_items<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(item.as_ref());
        out.push('\n');
    }
    out
}

/// Wraps an enum adapter into the value + `<name>_available` pair of
/// Signal extension attributes.
///
/// The value attribute carries both accessors; a missing get/set callback
/// surfaces as `Unsupported` at access time. The `_available` attribute is
/// read-only.
pub fn signal_enum_ext(name: &str, ext: EnumExt<Signal>) -> (SignalExt, SignalExt) {
    let ext = Arc::new(ext);
    let value = SignalExt::new(name)
        .with_read({
            let e = Arc::clone(&ext);
            move |signal| e.read(signal)
        })
        .with_write({
            let e = Arc::clone(&ext);
            move |signal, buf| e.write(signal, buf).map(|_| ())
        });
    let available = SignalExt::new(format!("{name}_available")).with_read(move |_| Ok(ext.available()));
    (value, available)
}

/// Wraps an enum adapter into the value + `<name>_available` pair of
/// Count extension attributes.
pub fn count_enum_ext(name: &str, ext: EnumExt<Count>) -> (CountExt, CountExt) {
    let ext = Arc::new(ext);
    let value = CountExt::new(name)
        .with_read({
            let e = Arc::clone(&ext);
            move |count| e.read(count)
        })
        .with_write({
            let e = Arc::clone(&ext);
            move |count, buf| e.write(count, buf).map(|_| ())
        });
    let available = CountExt::new(format!("{name}_available")).with_read(move |_| Ok(ext.available()));
    (value, available)
}

/// Wraps an enum adapter into the value + `<name>_available` pair of
/// device extension attributes.
pub fn device_enum_ext(name: &str, ext: EnumExt<Device>) -> (DeviceExt, DeviceExt) {
    let ext = Arc::new(ext);
    let value = DeviceExt::new(name)
        .with_read({
            let e = Arc::clone(&ext);
            move |device| e.read(device)
        })
        .with_write({
            let e = Arc::clone(&ext);
            move |device, buf| e.write(device, buf).map(|_| ())
        });
    let available =
        DeviceExt::new(format!("{name}_available")).with_read(move |_| Ok(ext.available()));
    (value, available)
}

//! Count node, Synapse association, and Count extension attributes.

use crate::{ActionKind, CounterResult, FunctionKind, Signal};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Read callback for a Count extension attribute.
pub type CountExtReadFn = Arc<dyn Fn(&Count) -> CounterResult<String> + Send + Sync>;

/// Write callback for a Count extension attribute.
pub type CountExtWriteFn = Arc<dyn Fn(&Count, &str) -> CounterResult<()> + Send + Sync>;

/// A driver-defined extension attribute attached to a Count.
#[derive(Clone)]
pub struct CountExt {
    pub name: String,
    pub read: Option<CountExtReadFn>,
    pub write: Option<CountExtWriteFn>,
}

impl CountExt {
    /// Creates an extension with no accessors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            read: None,
            write: None,
        }
    }

    /// Sets the read callback.
    pub fn with_read(
        mut self,
        read: impl Fn(&Count) -> CounterResult<String> + Send + Sync + 'static,
    ) -> Self {
        self.read = Some(Arc::new(read));
        self
    }

    /// Sets the write callback.
    pub fn with_write(
        mut self,
        write: impl Fn(&Count, &str) -> CounterResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.write = Some(Arc::new(write));
        self
    }
}

impl fmt::Debug for CountExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountExt")
            .field("name", &self.name)
            .field("read", &self.read.is_some())
            .field("write", &self.write.is_some())
            .finish()
    }
}

/// The association between a Count and one Signal it listens to.
///
/// The action index is a cache of the last mode confirmed by the hardware;
/// it is updated by the dispatch layer after a successful get/set
/// round-trip and read back by the `synapses` listing without an extra
/// hardware round-trip.
#[derive(Debug)]
pub struct Synapse {
    action: AtomicUsize,
    pub actions: Vec<ActionKind>,
    pub signal: Arc<Signal>,
}

impl Synapse {
    /// Creates a Synapse listening to `signal` with the given action modes.
    pub fn new(signal: Arc<Signal>, actions: Vec<ActionKind>) -> Self {
        Self {
            action: AtomicUsize::new(0),
            actions,
            signal,
        }
    }

    /// Returns the cached index of the current action mode.
    pub fn action_index(&self) -> usize {
        self.action.load(Ordering::Relaxed)
    }

    /// Stores the index of the last confirmed action mode.
    pub fn set_action_index(&self, index: usize) {
        self.action.store(index, Ordering::Relaxed);
    }

    /// Returns the cached current action mode, if the cache is in range.
    pub fn current_action(&self) -> Option<ActionKind> {
        self.actions.get(self.action_index()).copied()
    }
}

/// An accumulator/quadrature-decoding unit combining one or more Signals.
///
/// Identity is the driver-chosen `id`, used verbatim to synthesize the
/// `count<id>` group name.
#[derive(Debug)]
pub struct Count {
    pub id: i32,
    pub name: Option<String>,
    function: AtomicUsize,
    pub functions: Vec<FunctionKind>,
    pub synapses: Vec<Arc<Synapse>>,
    pub ext: Vec<Arc<CountExt>>,
}

impl Count {
    /// Creates an unnamed Count with the given function modes.
    pub fn new(id: i32, functions: Vec<FunctionKind>) -> Self {
        Self {
            id,
            name: None,
            function: AtomicUsize::new(0),
            functions,
            synapses: Vec::new(),
            ext: Vec::new(),
        }
    }

    /// Sets the device-specific Count name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a Synapse.
    pub fn with_synapse(mut self, synapse: Synapse) -> Self {
        self.synapses.push(Arc::new(synapse));
        self
    }

    /// Appends an extension attribute.
    pub fn with_ext(mut self, ext: CountExt) -> Self {
        self.ext.push(Arc::new(ext));
        self
    }

    /// Returns the cached index of the current function mode.
    pub fn function_index(&self) -> usize {
        self.function.load(Ordering::Relaxed)
    }

    /// Stores the index of the last confirmed function mode.
    pub fn set_function_index(&self, index: usize) {
        self.function.store(index, Ordering::Relaxed);
    }

    /// Returns the cached current function mode, if the cache is in range.
    pub fn current_function(&self) -> Option<FunctionKind> {
        self.functions.get(self.function_index()).copied()
    }
}

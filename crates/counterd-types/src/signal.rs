//! Signal node and Signal extension attributes.

use crate::CounterResult;
use std::fmt;
use std::sync::Arc;

/// Read callback for a Signal extension attribute.
pub type SignalExtReadFn = Arc<dyn Fn(&Signal) -> CounterResult<String> + Send + Sync>;

/// Write callback for a Signal extension attribute.
pub type SignalExtWriteFn = Arc<dyn Fn(&Signal, &str) -> CounterResult<()> + Send + Sync>;

/// A driver-defined extension attribute attached to a Signal.
///
/// Either callback may be absent; the attribute is still listed and simply
/// has no accessor in that direction. Driver state travels inside the
/// closures. Read callbacks return the full text of the attribute and are
/// expected to terminate it with a newline.
#[derive(Clone)]
pub struct SignalExt {
    pub name: String,
    pub read: Option<SignalExtReadFn>,
    pub write: Option<SignalExtWriteFn>,
}

impl SignalExt {
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
        read: impl Fn(&Signal) -> CounterResult<String> + Send + Sync + 'static,
    ) -> Self {
        self.read = Some(Arc::new(read));
        self
    }

    /// Sets the write callback.
    pub fn with_write(
        mut self,
        write: impl Fn(&Signal, &str) -> CounterResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.write = Some(Arc::new(write));
        self
    }
}

impl fmt::Debug for SignalExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalExt")
            .field("name", &self.name)
            .field("read", &self.read.is_some())
            .field("write", &self.write.is_some())
            .finish()
    }
}

/// A single physical input line a counting device observes.
///
/// Identity is the driver-chosen `id`, used verbatim to synthesize the
/// `signal<id>` group name. Duplicate ids are the driver's responsibility.
#[derive(Debug, Clone)]
pub struct Signal {
    pub id: i32,
    pub name: Option<String>,
    pub ext: Vec<Arc<SignalExt>>,
}

impl Signal {
    /// Creates an unnamed Signal.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            name: None,
            ext: Vec::new(),
        }
    }

    /// Sets the device-specific Signal name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends an extension attribute.
    pub fn with_ext(mut self, ext: SignalExt) -> Self {
        self.ext.push(Arc::new(ext));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_builder() {
        let signal = Signal::new(3)
            .with_name("quadrature A")
            .with_ext(SignalExt::new("index").with_read(|_| Ok("0\n".to_string())));

        assert_eq!(signal.id, 3);
        assert_eq!(signal.name.as_deref(), Some("quadrature A"));
        assert_eq!(signal.ext.len(), 1);
        assert!(signal.ext[0].read.is_some());
        assert!(signal.ext[0].write.is_none());
    }

    #[test]
    fn test_ext_without_accessors_allowed() {
        let ext = SignalExt::new("reserved");
        assert!(ext.read.is_none());
        assert!(ext.write.is_none());
    }

    #[test]
    fn test_ext_debug_shows_presence() {
        let ext = SignalExt::new("index").with_write(|_, _| Ok(()));
        let rendered = format!("{ext:?}");
        assert!(rendered.contains("read: false"));
        assert!(rendered.contains("write: true"));
    }
}

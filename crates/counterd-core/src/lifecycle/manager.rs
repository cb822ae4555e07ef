//! Device registration, unregistration, and deferred release.

use crate::host::{HostHandle, NamespaceHost, ReleaseFn};
use crate::lifecycle::node::DeviceNode;
use crate::namespace::{BuilderLimits, NamespaceBuilder};
use counterd_types::{CounterResult, Device};
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Lifecycle of one registered device.
///
/// `Unregistered` and `Building` exist only inside
/// [`DeviceRegistration::register`]; a wrapper observes `Published`,
/// `Unregistering`, and the terminal `Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unregistered,
    Building,
    Published,
    Unregistering,
    Released,
}

struct RegistrationInner {
    instance_id: u32,
    host: Arc<dyn NamespaceHost>,
    state: Mutex<LifecycleState>,
    node: Mutex<Option<Arc<DeviceNode>>>,
    finalized: AtomicBool,
}

impl RegistrationInner {
    fn state(&self) -> LifecycleState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: LifecycleState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Releases everything exactly once: builder output first, then the
    /// instance id. Safe to call from the host's deferred-release
    /// callback, from the drop backstop, or both.
    fn finalize(&self) {
        if self.finalized.swap(true, Ordering::SeqCst) {
            return;
        }
        let node = self
            .node
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(node);
        self.host.release_id(self.instance_id);
        self.set_state(LifecycleState::Released);
        debug!(instance = self.instance_id, "counter device released");
    }
}

/// Releases the held id on drop unless ownership was transferred.
struct IdLease {
    id: u32,
    host: Arc<dyn NamespaceHost>,
    armed: bool,
}

impl IdLease {
    fn acquire(host: Arc<dyn NamespaceHost>) -> CounterResult<Self> {
        let id = host.allocate_id()?;
        Ok(Self {
            id,
            host,
            armed: true,
        })
    }

    fn disarm(mut self) -> u32 {
        self.armed = false;
        self.id
    }
}

impl Drop for IdLease {
    fn drop(&mut self) {
        if self.armed {
            self.host.release_id(self.id);
        }
    }
}

/// A registered counter device.
///
/// Owns the published state on behalf of the driver. Unregistration is
/// explicit; dropping the wrapper while published leaves the device live
/// (use [`ScopedRegistration`] for scope-bound teardown).
pub struct DeviceRegistration {
    inner: Arc<RegistrationInner>,
    handle: HostHandle,
}

impl DeviceRegistration {
    /// Registers a device with the namespace host.
    ///
    /// Either the complete namespace becomes visible or nothing does:
    /// failure at any sub-step (validation, id allocation, build, publish)
    /// rolls back everything acquired so far before the error is returned.
    pub fn register(device: Device, host: Arc<dyn NamespaceHost>) -> CounterResult<Self> {
        Self::register_with_limits(device, host, BuilderLimits::default())
    }

    /// Registers with explicit builder capacity limits.
    pub fn register_with_limits(
        device: Device,
        host: Arc<dyn NamespaceHost>,
        limits: BuilderLimits,
    ) -> CounterResult<Self> {
        // Invalid models are rejected before any allocation.
        NamespaceBuilder::validate(&device)?;

        let lease = IdLease::acquire(Arc::clone(&host))?;
        // On error below, dropping the lease returns the id.
        let groups = NamespaceBuilder::new(&device).with_limits(limits).build()?;
        let node = Arc::new(DeviceNode::new(lease.id, Arc::new(device), groups));
        let handle = host.publish(&node, node.device().parent.as_deref())?;

        let instance_id = lease.disarm();
        let inner = Arc::new(RegistrationInner {
            instance_id,
            host: Arc::clone(&host),
            state: Mutex::new(LifecycleState::Published),
            node: Mutex::new(Some(node)),
            finalized: AtomicBool::new(false),
        });
        let release: ReleaseFn = Box::new({
            let inner = Arc::clone(&inner);
            move || inner.finalize()
        });
        host.on_final_release(handle, release);

        debug!(instance = instance_id, "counter device published");
        Ok(Self { inner, handle })
    }

    /// Returns the device's unique instance id.
    pub fn instance_id(&self) -> u32 {
        self.inner.instance_id
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.inner.state()
    }

    /// Returns the published node, `None` once released.
    pub fn node(&self) -> Option<Arc<DeviceNode>> {
        self.inner
            .node
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests host-side removal. Idempotent.
    ///
    /// Backing memory is released later, by the host's deferred-release
    /// callback, once no further dispatch can occur.
    pub fn unregister(&self) {
        {
            let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
            if *state != LifecycleState::Published {
                return;
            }
            *state = LifecycleState::Unregistering;
        }
        self.inner.host.unpublish(self.handle);
    }
}

impl fmt::Debug for DeviceRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRegistration")
            .field("instance_id", &self.inner.instance_id)
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for DeviceRegistration {
    fn drop(&mut self) {
        match self.state() {
            LifecycleState::Published => {
                warn!(
                    instance = self.inner.instance_id,
                    "registration dropped while published; unregister was never requested"
                );
            }
            // Unregister was requested but the host never fired the
            // release callback; reclaim here rather than leak the id.
            LifecycleState::Unregistering => self.inner.finalize(),
            _ => {}
        }
    }
}

/// A registration whose unregistration is bound to its own lifetime.
///
/// Dropping the scope unregisters exactly once, whether or not
/// [`unregister`](DeviceRegistration::unregister) was already called.
pub struct ScopedRegistration {
    registration: DeviceRegistration,
}

impl ScopedRegistration {
    /// Registers a device; teardown happens at drop.
    pub fn register(device: Device, host: Arc<dyn NamespaceHost>) -> CounterResult<Self> {
        Ok(Self {
            registration: DeviceRegistration::register(device, host)?,
        })
    }

    /// Registers with explicit builder capacity limits.
    pub fn register_with_limits(
        device: Device,
        host: Arc<dyn NamespaceHost>,
        limits: BuilderLimits,
    ) -> CounterResult<Self> {
        Ok(Self {
            registration: DeviceRegistration::register_with_limits(device, host, limits)?,
        })
    }
}

impl Deref for ScopedRegistration {
    type Target = DeviceRegistration;

    fn deref(&self) -> &DeviceRegistration {
        &self.registration
    }
}

impl fmt::Debug for ScopedRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedRegistration")
            .field("registration", &self.registration)
            .finish()
    }
}

impl Drop for ScopedRegistration {
    fn drop(&mut self) {
        self.registration.unregister();
    }
}
